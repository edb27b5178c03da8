//! Schema-source naming and statement source positions.
//!
//! Raw statements arrive from the textual parser already positioned; the
//! reactor never re-derives positions, it only carries them into
//! diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::revision::Revision;

/// Names a schema source whether or not it has been resolved.
///
/// A source identifier exists before linkage, so it carries the declared
/// name and revision only, never the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceIdentifier {
    /// Declared source (module or submodule) name.
    pub name: String,
    /// Declared revision, or the undated sentinel.
    pub revision: Revision,
}

impl SourceIdentifier {
    /// Create a source identifier.
    pub fn new(name: impl Into<String>, revision: Revision) -> Self {
        Self {
            name: name.into(),
            revision,
        }
    }
}

impl fmt::Display for SourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Revision::Undated => write!(f, "{}", self.name),
            rev => write!(f, "{}@{}", self.name, rev),
        }
    }
}

/// Position of one statement within a schema source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// The source the statement was declared in.
    pub source: SourceIdentifier,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourceRef {
    /// Create a source reference.
    pub fn new(source: SourceIdentifier, line: u32, column: u32) -> Self {
        Self {
            source,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}
