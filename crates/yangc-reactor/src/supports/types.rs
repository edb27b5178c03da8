//! Supports for `typedef` and `type`.
//!
//! Type resolution is where most retry rounds come from: a `type`
//! statement may name a builtin, a typedef declared anywhere in scope
//! (before or after the use site), or a prefixed typedef in an imported
//! module, and each step of the chain can be blocked until the
//! statement it depends on has published. The fully resolved definition
//! is published under the type statement itself, so chains of typedefs
//! resolve one link per round at worst.

use yangc_model::{BuiltinType, SourceRef};

use crate::argument::Argument;
use crate::context::{StmtHandle, StmtId, StmtView};
use crate::effective::{
    EffectiveDetail, EffectiveStatement, NumericTypeDefinition, TypeDefinition,
};
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{DependencyKey, NamespaceKind, NsKey, NsValue};
use crate::phase::Progress;
use crate::support::{StatementSupport, SubstatementValidator};

/// The `typedef` statement.
///
/// Publishes itself on its parent during statement definition, making the
/// name visible to every statement in the parent's subtree regardless of
/// declaration order.
pub struct TypedefStatementSupport {
    validator: SubstatementValidator,
}

impl TypedefStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder()
                .mandatory("type")
                .optional("units")
                .optional("default")
                .optional("status")
                .optional("description")
                .optional("reference")
                .build(),
        }
    }
}

impl Default for TypedefStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for TypedefStatementSupport {
    fn keyword(&self) -> &str {
        "typedef"
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
        stmt.put_ns_on_parent(NamespaceKind::Typedef, NsKey::Str(name), NsValue::Stmt(id))?;
        Ok(Progress::Done)
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}

/// The `type` statement.
pub struct TypeStatementSupport {
    validator: SubstatementValidator,
}

impl TypeStatementSupport {
    pub fn new() -> Self {
        Self {
            validator: SubstatementValidator::builder().optional("range").build(),
        }
    }

    /// Resolve the named base: a builtin, or the published resolution of
    /// the typedef this type refers to.
    fn resolve_base(
        &self,
        view: &StmtView<'_>,
        name: &str,
    ) -> Result<Result<TypeDefinition, Progress>, SourceError> {
        if let Some(builtin) = BuiltinType::from_name(name) {
            let def = match builtin {
                BuiltinType::String => TypeDefinition::String,
                BuiltinType::Boolean => TypeDefinition::Boolean,
                numeric => match NumericTypeDefinition::of(numeric) {
                    Some(def) => TypeDefinition::Numeric(def),
                    None => {
                        return Err(SourceError::new(
                            ErrorKind::Internal,
                            view.source_ref(),
                            format!("builtin '{}' has no numeric range", name),
                        ))
                    }
                },
            };
            return Ok(Ok(def));
        }

        // A typedef reference, possibly prefixed into an imported module.
        let typedef = match name.split_once(':') {
            Some((prefix, local)) => {
                match self.resolve_imported_typedef(view, prefix, local)? {
                    Ok(typedef) => typedef,
                    Err(blocked) => return Ok(Err(blocked)),
                }
            }
            None => {
                let key = NsKey::Str(name.to_string());
                match view.get_ns(NamespaceKind::Typedef, &key) {
                    Some(NsValue::Stmt(typedef)) => typedef,
                    _ => {
                        return Ok(Err(Progress::Blocked(DependencyKey::new(
                            NamespaceKind::Typedef,
                            key,
                        ))))
                    }
                }
            }
        };

        // Read the referenced typedef's own (resolved) type statement.
        let type_child = view.find_child_of(typedef, "type").ok_or_else(|| {
            SourceError::new(
                ErrorKind::MissingStatement,
                view.source_ref(),
                format!("typedef referenced by '{}' has no type statement", name),
            )
        })?;
        match view.get_ns_of(type_child, NamespaceKind::ResolvedType, &NsKey::Unit) {
            Some(NsValue::Type(def)) => Ok(Ok(def)),
            _ => Ok(Err(Progress::Blocked(DependencyKey::new(
                NamespaceKind::ResolvedType,
                NsKey::Str(name.to_string()),
            )))),
        }
    }

    /// Walk prefix, then namespace, then the target module's typedefs.
    fn resolve_imported_typedef(
        &self,
        view: &StmtView<'_>,
        prefix: &str,
        local: &str,
    ) -> Result<Result<StmtId, Progress>, SourceError> {
        let prefix_key = NsKey::Str(prefix.to_string());
        let qname_module = match view.get_ns(NamespaceKind::ImportPrefixToModule, &prefix_key) {
            Some(NsValue::QNameModule(qm)) => qm,
            _ => {
                return Ok(Err(Progress::Blocked(DependencyKey::new(
                    NamespaceKind::ImportPrefixToModule,
                    prefix_key,
                ))))
            }
        };

        let module_key = NsKey::QNameModule((*qname_module).clone());
        let module = match view.get_ns(NamespaceKind::NamespaceToModule, &module_key) {
            Some(NsValue::Stmt(module)) => module,
            _ => {
                return Ok(Err(Progress::Blocked(DependencyKey::new(
                    NamespaceKind::NamespaceToModule,
                    module_key,
                ))))
            }
        };

        let typedef_key = NsKey::Str(local.to_string());
        match view.get_ns_of(module, NamespaceKind::Typedef, &typedef_key) {
            Some(NsValue::Stmt(typedef)) => Ok(Ok(typedef)),
            _ => Ok(Err(Progress::Blocked(DependencyKey::new(
                NamespaceKind::Typedef,
                typedef_key,
            )))),
        }
    }
}

impl Default for TypeStatementSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSupport for TypeStatementSupport {
    fn keyword(&self) -> &str {
        "type"
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
        let name = view
            .argument()
            .as_str()
            .unwrap_or_default()
            .to_string();

        let base = match self.resolve_base(&view, &name)? {
            Ok(base) => base,
            Err(blocked) => return Ok(blocked),
        };

        let def = match view.child_argument("range").and_then(Argument::as_range) {
            Some(range) => {
                let TypeDefinition::Numeric(numeric) = base else {
                    return Err(SourceError::new(
                        ErrorKind::RangeViolation,
                        view.source_ref(),
                        format!("range restriction on non-numeric type '{}'", name),
                    ));
                };
                let narrowed = range.resolve(&numeric.range).map_err(|e| {
                    SourceError::new(ErrorKind::RangeViolation, view.source_ref(), e.to_string())
                })?;
                TypeDefinition::Numeric(NumericTypeDefinition {
                    base: numeric.base,
                    range: narrowed,
                    description: numeric.description,
                })
            }
            None => base,
        };

        stmt.put_ns(NamespaceKind::ResolvedType, NsKey::Unit, NsValue::Type(def))?;
        Ok(Progress::Done)
    }

    fn create_effective(
        &self,
        stmt: &StmtView<'_>,
        substatements: Vec<EffectiveStatement>,
    ) -> Result<EffectiveStatement, SourceError> {
        let def = match stmt.get_ns(NamespaceKind::ResolvedType, &NsKey::Unit) {
            Some(NsValue::Type(def)) => def,
            _ => {
                return Err(SourceError::new(
                    ErrorKind::Internal,
                    stmt.source_ref(),
                    format!("type '{}' frozen before resolution", stmt.argument()),
                ))
            }
        };
        Ok(
            EffectiveStatement::new(stmt.keyword(), stmt.argument().clone(), substatements)
                .with_detail(EffectiveDetail::Type(def)),
        )
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }
}
