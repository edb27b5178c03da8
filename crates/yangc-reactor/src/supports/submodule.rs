//! Supports for `submodule`, `belongs-to` and `include`.

use yangc_model::{ModuleIdentifier, QNameModule, SourceRef};

use crate::argument::Argument;
use crate::context::StmtHandle;
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{DependencyKey, NamespaceKind, NsKey, NsValue};
use crate::phase::Progress;
use crate::support::{StatementSupport, SubstatementValidator};

/// The `submodule` statement.
///
/// A submodule has no namespace of its own: linkage blocks until the
/// parent module named by `belongs-to` has published its namespace URI,
/// then adopts it. Submodules register in the module registry so
/// `include` can find them, but never appear in the effective model.
pub struct SubmoduleStatementSupport {
    validator: SubstatementValidator,
}

impl SubmoduleStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .optional("yang-version")
                .mandatory("belongs-to")
                .any("import")
                .any("include")
                .optional("organization")
                .optional("contact")
                .optional("description")
                .optional("reference")
                .any("revision")
                .any("typedef")
                .any("grouping")
                .any("container")
                .any("list")
                .any("leaf")
                .any("leaf-list")
                .any("uses")
                .build(),
        }
    }
}

impl Default for SubmoduleStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for SubmoduleStatementSupport {
    fn keyword(&self) -> &str {
        "submodule"
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword(), raw, at)
    }

    fn on_pre_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let view = stmt.view();
        let name = view
            .argument()
            .as_str()
            .unwrap_or_default()
            .to_string();
        if view.find_child("belongs-to").is_none() {
            return Err(SourceError::new(
                ErrorKind::MissingStatement,
                view.source_ref(),
                format!("belongs-to of submodule '{}' is missing", name),
            ));
        }
        let revision = super::module::latest_revision(&view);
        let id = stmt.id();
        stmt.put_ns(
            NamespaceKind::PreLinkageModule,
            NsKey::Module(ModuleIdentifier::new(name, revision)),
            NsValue::Stmt(id),
        )?;
        Ok(Progress::Done)
    }

    fn on_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let view = stmt.view();
        let name = view
            .argument()
            .as_str()
            .unwrap_or_default()
            .to_string();
        let parent_name = view
            .find_child("belongs-to")
            .map(|b| view.argument_of(b))
            .and_then(Argument::as_str)
            .unwrap_or_default()
            .to_string();

        let key = NsKey::Str(parent_name);
        let namespace = match view.get_ns(NamespaceKind::ModuleNameToNamespace, &key) {
            Some(NsValue::Uri(uri)) => uri,
            _ => {
                return Ok(Progress::Blocked(DependencyKey::new(
                    NamespaceKind::ModuleNameToNamespace,
                    key,
                )))
            }
        };

        let revision = super::module::latest_revision(&view);
        let qname_module = QNameModule::new(namespace, revision).intern();
        let id = stmt.id();

        stmt.put_ns(
            NamespaceKind::Module,
            NsKey::Module(ModuleIdentifier::new(name, revision)),
            NsValue::Stmt(id),
        )?;
        stmt.put_ns(
            NamespaceKind::ModuleQName,
            NsKey::Unit,
            NsValue::QNameModule(qname_module),
        )?;
        Ok(Progress::Done)
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}

/// The `include` statement.
///
/// Linkage only verifies the named submodule is present in the build;
/// with a `revision-date` substatement the exact revision is required.
pub struct IncludeStatementSupport {
    validator: SubstatementValidator,
}

impl IncludeStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .optional("revision-date")
                .build(),
        }
    }
}

impl Default for IncludeStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for IncludeStatementSupport {
    fn keyword(&self) -> &str {
        "include"
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword(), raw, at)
    }

    fn on_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let view = stmt.view();
        let name = view
            .argument()
            .as_str()
            .unwrap_or_default()
            .to_string();
        let pinned = view
            .child_argument("revision-date")
            .and_then(Argument::as_revision);

        match pinned {
            Some(revision) => {
                let key = NsKey::Module(ModuleIdentifier::new(name, revision));
                match view.get_ns(NamespaceKind::Module, &key) {
                    Some(NsValue::Stmt(_)) => Ok(Progress::Done),
                    _ => Ok(Progress::Blocked(DependencyKey::new(
                        NamespaceKind::Module,
                        key,
                    ))),
                }
            }
            None => match view.get_ns_latest(NamespaceKind::PreLinkageModule, &name) {
                Some(NsValue::Stmt(_)) => Ok(Progress::Done),
                _ => Ok(Progress::Blocked(DependencyKey::new(
                    NamespaceKind::PreLinkageModule,
                    NsKey::Str(name),
                ))),
            },
        }
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
