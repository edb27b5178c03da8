// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Statement resolution engine for the yangc schema toolchain
//!
//! This crate turns raw statement trees (produced by an external textual
//! parser) into a frozen effective schema model. Resolution is phase-gated:
//! every statement context advances through pre-linkage, linkage, statement
//! definition and full declaration in lock-step across the whole source
//! set, retrying contexts whose cross-references are not yet published and
//! failing the build when a full round makes no progress.

pub mod argument;
pub mod context;
pub mod effective;
pub mod error;
pub mod namespace;
pub mod phase;
pub mod raw;
pub mod reactor;
pub mod support;
pub mod supports;

pub use argument::{Argument, RangeArg, RangeBound};
pub use context::StmtId;
pub use effective::{
    EffectiveDetail, EffectiveModel, EffectiveStatement, LeafDetail, ModuleDetail,
    NumericTypeDefinition, TypeDefinition,
};
pub use error::{
    ErrorKind, Label, ModuleImport, ReactorError, SchemaResolutionError, SourceError,
};
pub use namespace::{DependencyKey, NamespaceKind, NsKey, NsValue, ScopePolicy};
pub use phase::{ModelPhase, Progress};
pub use raw::RawStatement;
pub use reactor::SchemaReactor;
pub use support::{Cardinality, StatementSupport, SubstatementValidator, SupportRegistry};
