//! Statement-kind handlers and the support registry.
//!
//! Every keyword is bound to a [`StatementSupport`]: argument parsing,
//! per-phase hooks and effective-statement construction for that kind,
//! plus a declared substatement cardinality table. The registry is open
//! for extension; registering a new kind never touches the scheduler.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use yangc_model::SourceRef;

use crate::argument::Argument;
use crate::context::{StmtHandle, StmtView};
use crate::effective::EffectiveStatement;
use crate::error::{ErrorKind, SourceError};
use crate::phase::Progress;

/// Unbounded upper occurrence count.
pub const MAX: u32 = u32::MAX;

/// Inclusive occurrence range for one substatement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Minimum occurrences.
    pub min: u32,
    /// Maximum occurrences; [`MAX`] for unbounded.
    pub max: u32,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max == MAX {
            write!(f, "[{},*]", self.min)
        } else {
            write!(f, "[{},{}]", self.min, self.max)
        }
    }
}

/// Declared substatement cardinality table for one statement kind.
///
/// Validated once, at the end of full declaration, against the final
/// frozen substatement multiset.
#[derive(Debug, Clone, Default)]
pub struct SubstatementValidator {
    rules: IndexMap<&'static str, Cardinality>,
}

impl SubstatementValidator {
    /// Start building a validator.
    pub fn builder() -> SubstatementValidatorBuilder {
        SubstatementValidatorBuilder {
            rules: IndexMap::new(),
        }
    }

    /// Validate the final substatement multiset of one parent.
    ///
    /// `children` is the ordered child keyword list; errors name the
    /// keyword, the declared range and the observed count.
    pub fn validate(
        &self,
        parent_keyword: &str,
        at: &SourceRef,
        children: &[&str],
    ) -> Vec<SourceError> {
        let mut errors = Vec::new();

        let mut counts: IndexMap<&str, u32> = IndexMap::new();
        for &child in children {
            *counts.entry(child).or_insert(0) += 1;
        }

        for (child, count) in &counts {
            match self.rules.get(child) {
                None => errors.push(SourceError::new(
                    ErrorKind::Cardinality,
                    at.clone(),
                    format!(
                        "substatement '{}' is not permitted in '{}'",
                        child, parent_keyword
                    ),
                )),
                Some(card) if *count > card.max => errors.push(SourceError::new(
                    ErrorKind::Cardinality,
                    at.clone(),
                    format!(
                        "'{}' requires substatement '{}' with cardinality {}, observed {}",
                        parent_keyword, child, card, count
                    ),
                )),
                Some(_) => {}
            }
        }

        for (child, card) in &self.rules {
            let count = counts.get(child).copied().unwrap_or(0);
            if count < card.min {
                errors.push(SourceError::new(
                    ErrorKind::Cardinality,
                    at.clone(),
                    format!(
                        "'{}' requires substatement '{}' with cardinality {}, observed {}",
                        parent_keyword, child, card, count
                    ),
                ));
            }
        }

        errors
    }
}

/// Builder for [`SubstatementValidator`].
#[derive(Debug, Default)]
pub struct SubstatementValidatorBuilder {
    rules: IndexMap<&'static str, Cardinality>,
}

impl SubstatementValidatorBuilder {
    /// Permit `keyword` with the given inclusive occurrence range.
    pub fn add(mut self, keyword: &'static str, min: u32, max: u32) -> Self {
        self.rules.insert(keyword, Cardinality { min, max });
        self
    }

    /// Permit `keyword` any number of times.
    pub fn any(self, keyword: &'static str) -> Self {
        self.add(keyword, 0, MAX)
    }

    /// Permit `keyword` at most once.
    pub fn optional(self, keyword: &'static str) -> Self {
        self.add(keyword, 0, 1)
    }

    /// Require `keyword` exactly once.
    pub fn mandatory(self, keyword: &'static str) -> Self {
        self.add(keyword, 1, 1)
    }

    /// Finish the table.
    pub fn build(self) -> SubstatementValidator {
        SubstatementValidator { rules: self.rules }
    }
}

/// Per-keyword handler: argument parsing, phase hooks, effective
/// construction and the substatement cardinality table.
///
/// Hooks are pure with respect to the tree except through the namespace
/// store; they must not mutate sibling contexts directly. Each hook
/// either completes (`Done`), asks to be retried once a dependency is
/// published (`Blocked`), or fails with a structural error.
pub trait StatementSupport: Send + Sync {
    /// The keyword this support handles.
    fn keyword(&self) -> &str;

    /// Parse the raw argument into its typed form.
    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError>;

    /// Pre-linkage hook: publish self-describing facts only.
    fn on_pre_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let _ = stmt;
        Ok(Progress::Done)
    }

    /// Linkage hook: resolve module-to-module references.
    fn on_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let _ = stmt;
        Ok(Progress::Done)
    }

    /// Statement-definition hook: resolve type/grouping references.
    fn on_statement_definition(
        &self,
        stmt: &mut StmtHandle<'_>,
    ) -> Result<Progress, SourceError> {
        let _ = stmt;
        Ok(Progress::Done)
    }

    /// Full-declaration hook: the substatement set is final.
    fn on_full_declaration(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let _ = stmt;
        Ok(Progress::Done)
    }

    /// Freeze a completed context into its effective counterpart.
    ///
    /// `substatements` are the already-frozen children in declaration
    /// order.
    fn create_effective(
        &self,
        stmt: &StmtView<'_>,
        substatements: Vec<EffectiveStatement>,
    ) -> Result<EffectiveStatement, SourceError> {
        Ok(EffectiveStatement::new(
            stmt.keyword(),
            stmt.argument().clone(),
            substatements,
        ))
    }

    /// Declared cardinality table, if this kind constrains its children.
    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        None
    }
}

/// Keyword-to-handler registry for one build.
#[derive(Clone, Default)]
pub struct SupportRegistry {
    supports: IndexMap<String, Arc<dyn StatementSupport>>,
}

impl SupportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in statement kind.
    pub fn with_builtins() -> Self {
        crate::supports::default_registry()
    }

    /// Register a statement kind, keyed by its keyword.
    ///
    /// Later registrations replace earlier ones, so callers can override
    /// built-ins.
    pub fn register(&mut self, support: Arc<dyn StatementSupport>) {
        self.supports.insert(support.keyword().to_string(), support);
    }

    /// Look up the handler for a keyword.
    pub fn get(&self, keyword: &str) -> Option<Arc<dyn StatementSupport>> {
        self.supports.get(keyword).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yangc_model::{Revision, SourceIdentifier};

    fn at() -> SourceRef {
        SourceRef::new(SourceIdentifier::new("acme", Revision::Undated), 1, 1)
    }

    fn validator() -> SubstatementValidator {
        SubstatementValidator::builder()
            .mandatory("namespace")
            .mandatory("prefix")
            .optional("description")
            .any("import")
            .build()
    }

    #[test]
    fn test_missing_mandatory_names_keyword_and_range() {
        let errors = validator().validate("module", &at(), &["prefix"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Cardinality);
        assert!(errors[0].message.contains("'namespace'"));
        assert!(errors[0].message.contains("[1,1]"));
        assert!(errors[0].message.contains("observed 0"));
    }

    #[test]
    fn test_excess_occurrence_names_observed_count() {
        let errors = validator().validate(
            "module",
            &at(),
            &["namespace", "prefix", "prefix"],
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'prefix'"));
        assert!(errors[0].message.contains("observed 2"));
    }

    #[test]
    fn test_unbounded_keyword_accepts_many() {
        let errors = validator().validate(
            "module",
            &at(),
            &["namespace", "prefix", "import", "import", "import"],
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unlisted_keyword_is_rejected() {
        let errors = validator().validate("module", &at(), &["namespace", "prefix", "rpc"]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'rpc'"));
        assert!(errors[0].message.contains("not permitted"));
    }

    #[test]
    fn test_cardinality_display() {
        assert_eq!(Cardinality { min: 1, max: 1 }.to_string(), "[1,1]");
        assert_eq!(Cardinality { min: 0, max: MAX }.to_string(), "[0,*]");
    }
}
