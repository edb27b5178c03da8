//! Supports for `grouping` and `uses`.

use yangc_model::SourceRef;

use crate::argument::Argument;
use crate::context::StmtHandle;
use crate::error::SourceError;
use crate::namespace::{DependencyKey, NamespaceKind, NsKey, NsValue};
use crate::phase::Progress;
use crate::support::{StatementSupport, SubstatementValidator};

/// The `grouping` statement.
///
/// Publishes itself on its parent during statement definition, the same
/// visibility rule as typedef.
pub struct GroupingStatementSupport {
    validator: SubstatementValidator,
}

impl GroupingStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .any("leaf")
                .any("leaf-list")
                .any("container")
                .any("list")
                .any("uses")
                .any("typedef")
                .any("grouping")
                .optional("status")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }
}

impl Default for GroupingStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for GroupingStatementSupport {
    fn keyword(&self) -> &str {
        "grouping"
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword(), raw, at)
    }

    fn on_statement_definition(
        &self,
        stmt: &mut StmtHandle<'_>,
    ) -> Result<Progress, SourceError> {
        let name = stmt
            .view()
            .argument()
            .as_str()
            .unwrap_or_default()
            .to_string();
        let id = stmt.id();
        stmt.put_ns_on_parent(NamespaceKind::Grouping, NsKey::Str(name), NsValue::Stmt(id))?;
        Ok(Progress::Done)
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}

/// The `uses` statement.
///
/// Statement definition blocks until the referenced grouping has
/// published, in this module's scope or through an import prefix.
pub struct UsesStatementSupport {
    validator: SubstatementValidator,
}

impl UsesStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .optional("status")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }
}

impl Default for UsesStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for UsesStatementSupport {
    fn keyword(&self) -> &str {
        "uses"
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword(), raw, at)
    }

    fn on_statement_definition(
        &self,
        stmt: &mut StmtHandle<'_>,
    ) -> Result<Progress, SourceError> {
        let view = stmt.view();
        let name = view.argument().as_str().unwrap_or_default();

        match name.split_once(':') {
            Some((prefix, local)) => {
                let prefix_key = NsKey::Str(prefix.to_string());
                let qname_module =
                    match view.get_ns(NamespaceKind::ImportPrefixToModule, &prefix_key) {
                        Some(NsValue::QNameModule(qm)) => qm,
                        _ => {
                            return Ok(Progress::Blocked(DependencyKey::new(
                                NamespaceKind::ImportPrefixToModule,
                                prefix_key,
                            )))
                        }
                    };
                let module_key = NsKey::QNameModule((*qname_module).clone());
                let module = match view.get_ns(NamespaceKind::NamespaceToModule, &module_key) {
                    Some(NsValue::Stmt(module)) => module,
                    _ => {
                        return Ok(Progress::Blocked(DependencyKey::new(
                            NamespaceKind::NamespaceToModule,
                            module_key,
                        )))
                    }
                };
                let key = NsKey::Str(local.to_string());
                match view.get_ns_of(module, NamespaceKind::Grouping, &key) {
                    Some(NsValue::Stmt(_)) => Ok(Progress::Done),
                    _ => Ok(Progress::Blocked(DependencyKey::new(
                        NamespaceKind::Grouping,
                        key,
                    ))),
                }
            }
            None => {
                let key = NsKey::Str(name.to_string());
                match view.get_ns(NamespaceKind::Grouping, &key) {
                    Some(NsValue::Stmt(_)) => Ok(Progress::Done),
                    _ => Ok(Progress::Blocked(DependencyKey::new(
                        NamespaceKind::Grouping,
                        key,
                    ))),
                }
            }
        }
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
