//! Raw statement input model.
//!
//! The textual parser (outside this crate) produces one [`RawStatement`]
//! tree per schema source: keyword, raw argument string, ordered children
//! and a source position per node. The reactor consumes these trees and
//! never touches text again.

use yangc_model::SourceRef;

/// One node of a pre-parsed statement tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    /// Statement keyword as written in source.
    pub keyword: String,
    /// Raw argument string, if the statement has one.
    pub argument: Option<String>,
    /// Substatements in declaration order.
    pub children: Vec<RawStatement>,
    /// Position of the statement's keyword.
    pub at: SourceRef,
}

impl RawStatement {
    /// Create a leaf raw statement.
    pub fn new(keyword: impl Into<String>, argument: Option<&str>, at: SourceRef) -> Self {
        Self {
            keyword: keyword.into(),
            argument: argument.map(str::to_string),
            children: Vec::new(),
            at,
        }
    }

    /// Append a child, preserving declaration order.
    pub fn with_child(mut self, child: RawStatement) -> Self {
        self.children.push(child);
        self
    }
}
