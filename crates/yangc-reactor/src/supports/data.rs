//! Supports for the data-definition statements: `leaf`, `leaf-list`,
//! `container` and `list`.
//!
//! Data nodes have no resolution behavior of their own; their `type`
//! substatements resolve independently. Freezing derives each node's
//! qualified name from the owning module's published identity.

use yangc_model::{QName, SourceRef};

use crate::argument::Argument;
use crate::context::StmtView;
use crate::effective::{EffectiveDetail, EffectiveStatement, LeafDetail};
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{NamespaceKind, NsKey, NsValue};
use crate::support::{StatementSupport, SubstatementValidator};

/// The node's qualified name under the owning module.
fn node_qname(stmt: &StmtView<'_>) -> Result<QName, SourceError> {
    let name = stmt.argument().as_str().unwrap_or_default();
    match stmt.get_ns(NamespaceKind::ModuleQName, &NsKey::Unit) {
        Some(NsValue::QNameModule(qm)) => Ok(QName::new(qm, name)),
        _ => Err(SourceError::new(
            ErrorKind::Internal,
            stmt.source_ref(),
            format!("node '{}' frozen before its module linked", name),
        )),
    }
}

/// `leaf` and `leaf-list`: terminal nodes with a resolved value type.
pub struct LeafStatementSupport {
    keyword: &'static str,
    validator: SubstatementValidator,
}

impl LeafStatementSupport {
    pub fn leaf() -> Self {
        Self {
            keyword: "leaf",
            validator: SubstatementValidator::builder()
                .mandatory("type")
                .optional("units")
                .optional("default")
                .optional("config")
                .optional("mandatory")
                .optional("status")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }

    pub fn leaf_list() -> Self {
        Self {
            keyword: "leaf-list",
            validator: SubstatementValidator::builder()
                .mandatory("type")
                .optional("units")
                .optional("config")
                .optional("min-elements")
                .optional("max-elements")
                .optional("ordered-by")
                .optional("status")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }
}

impl StatementSupport for LeafStatementSupport {
    fn keyword(&self) -> &str {
        self.keyword
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword, raw, at)
    }

    fn create_effective(
        &self,
        stmt: &StmtView<'_>,
        substatements: Vec<EffectiveStatement>,
    ) -> Result<EffectiveStatement, SourceError> {
        let qname = node_qname(stmt)?;
        let type_def = substatements
            .iter()
            .find(|s| s.keyword == "type")
            .and_then(|s| s.as_type())
            .cloned()
            .ok_or_else(|| {
                SourceError::new(
                    ErrorKind::Internal,
                    stmt.source_ref(),
                    format!("{} '{}' frozen without a resolved type", self.keyword, qname),
                )
            })?;
        Ok(
            EffectiveStatement::new(stmt.keyword(), stmt.argument().clone(), substatements)
                .with_detail(EffectiveDetail::Leaf(LeafDetail { qname, type_def })),
        )
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}

/// `container` and `list`: interior nodes holding further data nodes.
pub struct NodeStatementSupport {
    keyword: &'static str,
    validator: SubstatementValidator,
}

impl NodeStatementSupport {
    pub fn container() -> Self {
        Self {
            keyword: "container",
            validator: Self::interior_validator().optional("presence").build(),
        }
    }

    pub fn list() -> Self {
        Self {
            keyword: "list",
            validator: Self::interior_validator()
                .optional("key")
                .optional("min-elements")
                .optional("max-elements")
                .optional("ordered-by")
                .build(),
        }
    }

    fn interior_validator() -> crate::support::SubstatementValidatorBuilder {
        SubstatementValidator::builder()
            .any("leaf")
            .any("leaf-list")
            .any("container")
            .any("list")
            .any("uses")
            .any("typedef")
            .any("grouping")
            .optional("config")
            .optional("status")
            .optional("description")
            .optional("reference")
    }
}

impl StatementSupport for NodeStatementSupport {
    fn keyword(&self) -> &str {
        self.keyword
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword, raw, at)
    }

    fn create_effective(
        &self,
        stmt: &StmtView<'_>,
        substatements: Vec<EffectiveStatement>,
    ) -> Result<EffectiveStatement, SourceError> {
        let qname = node_qname(stmt)?;
        Ok(
            EffectiveStatement::new(stmt.keyword(), stmt.argument().clone(), substatements)
                .with_detail(EffectiveDetail::Node { qname }),
        )
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
