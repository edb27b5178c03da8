//! Build diagnostics.
//!
//! Two error surfaces exist, matching the two ways a build can fail:
//!
//! - [`SourceError`] — a single statement is structurally invalid (bad
//!   argument, cardinality violation, conflicting namespace entry, range
//!   violation). Carries the offending source position and optional
//!   secondary labels.
//! - [`SchemaResolutionError`] — the scheduler made a full round without
//!   progress while contexts were still blocked. Carries the resolved
//!   source list and the per-source unsatisfied imports as structured
//!   data so callers can retry with additional sources.
//!
//! "Not yet resolved" is never an error: phase hooks report it as
//! [`Progress::Blocked`](crate::phase::Progress) and only the scheduler
//! decides when blocked becomes terminal.

use std::fmt;

use indexmap::IndexMap;
use yangc_model::{Revision, SourceIdentifier, SourceRef};

/// Category of statement-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Argument cannot be parsed into its typed form.
    Syntax,
    /// Keyword has no registered statement support.
    UnknownStatement,
    /// A required substatement is absent where a phase hook needs it.
    MissingStatement,
    /// Substatement count outside the declared occurrence range.
    Cardinality,
    /// Two different values published for the same namespace key.
    NamespaceConflict,
    /// Numeric restriction falls outside its base type's bounds.
    RangeViolation,
    /// A reference names a symbol that can never resolve.
    UndefinedReference,
    /// Bug in the reactor or a statement support.
    Internal,
}

impl ErrorKind {
    /// Human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnknownStatement => "unknown statement",
            ErrorKind::MissingStatement => "missing statement",
            ErrorKind::Cardinality => "cardinality violation",
            ErrorKind::NamespaceConflict => "namespace conflict",
            ErrorKind::RangeViolation => "range violation",
            ErrorKind::UndefinedReference => "undefined reference",
            ErrorKind::Internal => "internal reactor error",
        }
    }
}

/// Secondary labeled position in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Related source position.
    pub at: SourceRef,
    /// Label text (e.g. "first published here").
    pub message: String,
}

/// A statement-level diagnostic with source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    /// Category of this error.
    pub kind: ErrorKind,
    /// Offending statement position.
    pub at: SourceRef,
    /// Human-readable message.
    pub message: String,
    /// Related positions.
    pub labels: Vec<Label>,
}

impl SourceError {
    /// Create a new statement-level error.
    pub fn new(kind: ErrorKind, at: SourceRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            at,
            message: message.into(),
            labels: Vec::new(),
        }
    }

    /// Add a secondary labeled position.
    pub fn with_label(mut self, at: SourceRef, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            at,
            message: message.into(),
        });
        self
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {}: {} (at {})",
            self.kind.name(),
            self.message,
            self.at
        )
    }
}

impl std::error::Error for SourceError {}

/// One unsatisfied import declaration, as reported in a resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    /// Name of the imported module.
    pub module_name: String,
    /// Requested revision, when the import pins one.
    pub revision: Option<Revision>,
    /// Position of the import statement.
    pub at: SourceRef,
}

impl fmt::Display for ModuleImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(f, "import {}@{}", self.module_name, rev),
            None => write!(f, "import {}", self.module_name),
        }
    }
}

/// Terminal resolution failure: a scheduler round made no progress while
/// contexts remained blocked.
///
/// The resolved/unsatisfied breakdown is structured so callers can retry
/// programmatically with additional sources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}, resolved sources: {resolved:?}, unsatisfied imports: {unsatisfied:?}")]
pub struct SchemaResolutionError {
    /// Human-readable failure summary.
    pub message: String,
    /// Sources that did resolve.
    pub resolved: Vec<SourceIdentifier>,
    /// Per unresolved source, the import declarations that blocked it.
    pub unsatisfied: IndexMap<SourceIdentifier, Vec<ModuleImport>>,
}

/// Top-level build error surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReactorError {
    /// One or more statements are structurally invalid.
    #[error("invalid schema source(s): {} error(s)", .0.len())]
    Invalid(Vec<SourceError>),
    /// The build could not resolve all cross-source dependencies.
    #[error(transparent)]
    Resolution(#[from] SchemaResolutionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use yangc_model::Revision;

    fn at() -> SourceRef {
        SourceRef::new(SourceIdentifier::new("acme", Revision::Undated), 3, 5)
    }

    #[test]
    fn test_error_display_carries_kind_and_position() {
        let err = SourceError::new(ErrorKind::Cardinality, at(), "too many prefixes");
        let text = err.to_string();
        assert!(text.contains("cardinality violation"));
        assert!(text.contains("too many prefixes"));
        assert!(text.contains("acme:3:5"));
    }

    #[test]
    fn test_error_labels_accumulate() {
        let err = SourceError::new(ErrorKind::NamespaceConflict, at(), "conflict")
            .with_label(at(), "first published here");
        assert_eq!(err.labels.len(), 1);
    }

    #[test]
    fn test_resolution_error_formats_breakdown() {
        let mut unsatisfied = IndexMap::new();
        unsatisfied.insert(
            SourceIdentifier::new("b", Revision::Undated),
            vec![ModuleImport {
                module_name: "x".to_string(),
                revision: None,
                at: at(),
            }],
        );
        let err = SchemaResolutionError {
            message: "no progress in linkage".to_string(),
            resolved: vec![SourceIdentifier::new("a", Revision::Undated)],
            unsatisfied,
        };
        let text = err.to_string();
        assert!(text.contains("no progress in linkage"));
        assert!(text.contains("resolved sources"));
        assert!(text.contains("unsatisfied imports"));
    }
}
