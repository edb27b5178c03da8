// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Foundation types for the yangc schema toolchain
//!
//! This crate contains the identity, revision, source-reference and
//! built-in type definitions shared by the statement reactor and by
//! downstream consumers of the effective model.

pub mod ident;
pub mod revision;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use ident::{ModuleIdentifier, QName, QNameModule};
pub use revision::Revision;
pub use source::{SourceIdentifier, SourceRef};
pub use types::{BuiltinType, NumericRange, RangeError};
