//! Support for the `import` statement.

use yangc_model::{ModuleIdentifier, SourceRef};

use crate::argument::Argument;
use crate::context::StmtHandle;
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{DependencyKey, NamespaceKind, NsKey, NsValue};
use crate::phase::Progress;
use crate::support::{StatementSupport, SubstatementValidator};

/// The `import` statement: binds a prefix to another module.
///
/// Linkage blocks until the imported module has published its qualified
/// identity; with a `revision-date` substatement the exact revision is
/// required, otherwise any revision of the named module satisfies the
/// import.
pub struct ImportStatementSupport {
    validator: SubstatementValidator,
}

impl ImportStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .mandatory("prefix")
                .optional("revision-date")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }
}

impl Default for ImportStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for ImportStatementSupport {
    fn keyword(&self) -> &str {
        "import"
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
        let prefix = view
            .child_argument("prefix")
            .and_then(Argument::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SourceError::new(
                    ErrorKind::MissingStatement,
                    view.source_ref(),
                    format!("prefix of import '{}' is missing", name),
                )
            })?;
        let pinned = view
            .child_argument("revision-date")
            .and_then(Argument::as_revision);

        let qname_module = match pinned {
            // An exact-revision import resolves only against that revision.
            Some(revision) => {
                let key = NsKey::Module(ModuleIdentifier::new(name, revision));
                match view.get_ns(NamespaceKind::ModuleNameToModule, &key) {
                    Some(NsValue::QNameModule(qm)) => qm,
                    _ => {
                        return Ok(Progress::Blocked(DependencyKey::new(
                            NamespaceKind::ModuleNameToModule,
                            key,
                        )))
                    }
                }
            }
            // A revision-agnostic import takes the latest registered one.
            None => match view.get_ns_latest(NamespaceKind::ModuleNameToModule, &name) {
                Some(NsValue::QNameModule(qm)) => qm,
                _ => {
                    return Ok(Progress::Blocked(DependencyKey::new(
                        NamespaceKind::ModuleNameToModule,
                        NsKey::Str(name),
                    )))
                }
            },
        };

        stmt.put_ns(
            NamespaceKind::ImportPrefixToModule,
            NsKey::Str(prefix),
            NsValue::QNameModule(qname_module),
        )?;
        Ok(Progress::Done)
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
