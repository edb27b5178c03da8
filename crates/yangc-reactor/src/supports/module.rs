//! Support for the `module` statement.

use yangc_model::{ModuleIdentifier, QNameModule, Revision, SourceRef};

use crate::argument::Argument;
use crate::context::{StmtHandle, StmtView};
use crate::effective::{EffectiveDetail, EffectiveStatement, ModuleDetail};
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{NamespaceKind, NsKey, NsValue};
use crate::phase::Progress;
use crate::support::{StatementSupport, SubstatementValidator};

/// The `module` statement: the root of one schema source.
///
/// Pre-linkage publishes the module's self-describing facts (name,
/// namespace URI, prefix) so other sources can link against it without
/// waiting for this module to link itself. Linkage then computes the
/// module's qualified identity from the latest declared revision.
pub struct ModuleStatementSupport {
    validator: SubstatementValidator,
}

impl ModuleStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .optional("yang-version")
                .mandatory("namespace")
                .mandatory("prefix")
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

impl Default for ModuleStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

/// The module's name plus its mandatory children, or the error naming
/// what is missing. Shared by the pre-linkage and linkage hooks.
fn declared_facts(
    view: &StmtView<'_>,
) -> Result<(String, url::Url, String), SourceError> {
    let name = view
        .argument()
        .as_str()
        .ok_or_else(|| missing(view, "module name argument"))?
        .to_string();
    let namespace = view
        .child_argument("namespace")
        .and_then(Argument::as_uri)
        .cloned()
        .ok_or_else(|| missing(view, &format!("namespace of module '{}'", name)))?;
    let prefix = view
        .child_argument("prefix")
        .and_then(Argument::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(view, &format!("prefix of module '{}'", name)))?;
    Ok((name, namespace, prefix))
}

fn missing(view: &StmtView<'_>, what: &str) -> SourceError {
    SourceError::new(
        ErrorKind::MissingStatement,
        view.source_ref(),
        format!("{} is missing", what),
    )
}

/// Latest declared revision, or the undated sentinel when the module
/// declares none.
pub(crate) fn latest_revision(view: &StmtView<'_>) -> Revision {
    view.child_arguments("revision")
        .iter()
        .filter_map(|a| a.as_revision())
        .max()
        .unwrap_or(Revision::Undated)
}

impl StatementSupport for ModuleStatementSupport {
    fn keyword(&self) -> &str {
        "module"
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        super::simple::identifier(self.keyword(), raw, at)
    }

    fn on_pre_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let (name, namespace, prefix) = declared_facts(&stmt.view())?;
        let revision = latest_revision(&stmt.view());
        let id = stmt.id();

        // Keyed per revision so another revision of the same module name
        // registers alongside instead of colliding.
        stmt.put_ns(
            NamespaceKind::PreLinkageModule,
            NsKey::Module(ModuleIdentifier::new(name.clone(), revision)),
            NsValue::Stmt(id),
        )?;
        stmt.put_ns(
            NamespaceKind::ModuleNameToNamespace,
            NsKey::Str(name),
            NsValue::Uri(namespace.clone()),
        )?;
        stmt.put_ns(
            NamespaceKind::PrefixToNamespace,
            NsKey::Str(prefix),
            NsValue::Uri(namespace),
        )?;
        Ok(Progress::Done)
    }

    fn on_linkage(&self, stmt: &mut StmtHandle<'_>) -> Result<Progress, SourceError> {
        let (name, namespace, prefix) = declared_facts(&stmt.view())?;
        let revision = latest_revision(&stmt.view());
        let qname_module = QNameModule::new(namespace, revision).intern();
        let id = stmt.id();

        stmt.put_ns(
            NamespaceKind::Module,
            NsKey::Module(ModuleIdentifier::new(name.clone(), revision)),
            NsValue::Stmt(id),
        )?;
        stmt.put_ns(
            NamespaceKind::NamespaceToModule,
            NsKey::QNameModule((*qname_module).clone()),
            NsValue::Stmt(id),
        )?;
        stmt.put_ns(
            NamespaceKind::ModuleNameToModule,
            NsKey::Module(ModuleIdentifier::new(name, revision)),
            NsValue::QNameModule(qname_module.clone()),
        )?;
        stmt.put_ns(
            NamespaceKind::PrefixToModule,
            NsKey::Str(prefix),
            NsValue::QNameModule(qname_module.clone()),
        )?;
        stmt.put_ns(
            NamespaceKind::ModuleQName,
            NsKey::Unit,
            NsValue::QNameModule(qname_module),
        )?;
        Ok(Progress::Done)
    }

    fn create_effective(
        &self,
        stmt: &StmtView<'_>,
        substatements: Vec<EffectiveStatement>,
    ) -> Result<EffectiveStatement, SourceError> {
        let (name, _, prefix) = declared_facts(stmt)?;
        let qname_module = match stmt.get_ns(NamespaceKind::ModuleQName, &NsKey::Unit) {
            Some(NsValue::QNameModule(qm)) => qm,
            _ => {
                return Err(SourceError::new(
                    ErrorKind::Internal,
                    stmt.source_ref(),
                    format!("module '{}' frozen before linkage", name),
                ))
            }
        };
        Ok(
            EffectiveStatement::new(stmt.keyword(), stmt.argument().clone(), substatements)
                .with_detail(EffectiveDetail::Module(ModuleDetail {
                    name,
                    qname_module,
                    prefix,
                })),
        )
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
