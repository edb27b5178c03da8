//! Build phases and phase-hook outcomes.
//!
//! Phases form a total order. The scheduler never starts phase `p + 1`
//! for any context until every context in the build has completed phase
//! `p`; within a phase, contexts whose dependencies are not yet published
//! are retried in later rounds.

use std::fmt;

use crate::namespace::DependencyKey;

/// One stage of the ordered multi-pass resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelPhase {
    /// Context created, no phase completed yet.
    Init,
    /// Self-describing facts published (own namespace URI, own prefix).
    PreLinkage,
    /// Module-to-module references resolved (imports, includes).
    Linkage,
    /// Intra- and inter-module type/grouping references resolved.
    StatementDefinition,
    /// Substatement set final; cardinality validated.
    FullDeclaration,
    /// Contexts frozen into effective statements.
    EffectiveModel,
}

impl ModelPhase {
    /// The phase following this one, if any.
    pub fn next(self) -> Option<ModelPhase> {
        Some(match self {
            ModelPhase::Init => ModelPhase::PreLinkage,
            ModelPhase::PreLinkage => ModelPhase::Linkage,
            ModelPhase::Linkage => ModelPhase::StatementDefinition,
            ModelPhase::StatementDefinition => ModelPhase::FullDeclaration,
            ModelPhase::FullDeclaration => ModelPhase::EffectiveModel,
            ModelPhase::EffectiveModel => return None,
        })
    }

    /// Human-readable phase name.
    pub fn name(self) -> &'static str {
        match self {
            ModelPhase::Init => "init",
            ModelPhase::PreLinkage => "pre-linkage",
            ModelPhase::Linkage => "linkage",
            ModelPhase::StatementDefinition => "statement-definition",
            ModelPhase::FullDeclaration => "full-declaration",
            ModelPhase::EffectiveModel => "effective-model",
        }
    }
}

impl fmt::Display for ModelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of a phase hook.
///
/// `Blocked` is a value, not an error: it asks the scheduler to retry the
/// context in the next round of the same phase. Structural failures are
/// reported through `Result::Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The context completed the current phase.
    Done,
    /// A namespace lookup came back empty; retry once the key is published.
    Blocked(DependencyKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_are_totally_ordered() {
        assert!(ModelPhase::Init < ModelPhase::PreLinkage);
        assert!(ModelPhase::PreLinkage < ModelPhase::Linkage);
        assert!(ModelPhase::Linkage < ModelPhase::StatementDefinition);
        assert!(ModelPhase::StatementDefinition < ModelPhase::FullDeclaration);
        assert!(ModelPhase::FullDeclaration < ModelPhase::EffectiveModel);
    }

    #[test]
    fn test_next_walks_the_pipeline() {
        let mut phase = ModelPhase::Init;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(phase, ModelPhase::EffectiveModel);
    }
}
