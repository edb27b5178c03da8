//! Built-in statement supports.
//!
//! One module per statement family; [`default_registry`] assembles them
//! into the registry a plain [`SchemaReactor::new`] uses. Token
//! statements with no behavior of their own are wired up here directly
//! from [`simple::SimpleSupport`].
//!
//! [`SchemaReactor::new`]: crate::reactor::SchemaReactor::new

use std::sync::Arc;

use crate::support::{SubstatementValidator, SupportRegistry};

pub mod data;
pub mod grouping;
pub mod import;
pub mod module;
pub mod simple;
pub mod submodule;
pub mod types;

pub use data::{LeafStatementSupport, NodeStatementSupport};
pub use grouping::{GroupingStatementSupport, UsesStatementSupport};
pub use import::ImportStatementSupport;
pub use module::ModuleStatementSupport;
pub use simple::SimpleSupport;
pub use submodule::{IncludeStatementSupport, SubmoduleStatementSupport};
pub use types::{TypeStatementSupport, TypedefStatementSupport};

/// The registry of every built-in statement kind.
pub fn default_registry() -> SupportRegistry {
    let mut registry = SupportRegistry::new();

    registry.register(Arc::new(ModuleStatementSupport::new()));
    registry.register(Arc::new(SubmoduleStatementSupport::new()));
    registry.register(Arc::new(ImportStatementSupport::new()));
    registry.register(Arc::new(IncludeStatementSupport::new()));
    registry.register(Arc::new(TypedefStatementSupport::new()));
    registry.register(Arc::new(TypeStatementSupport::new()));
    registry.register(Arc::new(GroupingStatementSupport::new()));
    registry.register(Arc::new(UsesStatementSupport::new()));
    registry.register(Arc::new(LeafStatementSupport::leaf()));
    registry.register(Arc::new(LeafStatementSupport::leaf_list()));
    registry.register(Arc::new(NodeStatementSupport::container()));
    registry.register(Arc::new(NodeStatementSupport::list()));

    registry.register(Arc::new(SimpleSupport::new("namespace", simple::uri)));
    registry.register(Arc::new(SimpleSupport::new("prefix", simple::identifier)));
    registry.register(Arc::new(
        SimpleSupport::new("belongs-to", simple::identifier).with_validator(
            SubstatementValidator::builder().mandatory("prefix").build(),
        ),
    ));
    registry.register(Arc::new(
        SimpleSupport::new("revision", simple::revision_date).with_validator(
            SubstatementValidator::builder()
                .optional("description")
                .optional("reference")
                .build(),
        ),
    ));
    registry.register(Arc::new(SimpleSupport::new(
        "revision-date",
        simple::revision_date,
    )));
    registry.register(Arc::new(SimpleSupport::new(
        "yang-version",
        simple::yang_version,
    )));
    registry.register(Arc::new(SimpleSupport::new("range", simple::range)));
    registry.register(Arc::new(SimpleSupport::new("config", simple::boolean)));
    registry.register(Arc::new(SimpleSupport::new("mandatory", simple::boolean)));
    registry.register(Arc::new(SimpleSupport::new("status", simple::status)));

    for keyword in [
        "organization",
        "contact",
        "description",
        "reference",
        "units",
        "default",
        "key",
        "presence",
        "min-elements",
        "max-elements",
        "ordered-by",
    ] {
        registry.register(Arc::new(SimpleSupport::new(keyword, simple::text)));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_core_keywords() {
        let registry = default_registry();
        for keyword in [
            "module",
            "submodule",
            "import",
            "include",
            "typedef",
            "type",
            "grouping",
            "uses",
            "leaf",
            "leaf-list",
            "container",
            "list",
            "namespace",
            "prefix",
            "revision",
            "range",
        ] {
            assert!(registry.get(keyword).is_some(), "missing {}", keyword);
        }
        assert!(registry.get("rpc").is_none());
    }
}
