//! Typed namespace stores.
//!
//! A namespace is a distinct symbol table identified by a
//! [`NamespaceKind`]. Statement supports publish cross-statement facts
//! into namespaces during phase hooks and later statements look them up;
//! an absent entry is the scheduler's retry signal, never an error.
//!
//! Entries are write-once per key: re-publishing the identical value is
//! idempotent, publishing a different value is a conflict. Every entry
//! records where it was published so a conflict can point at both
//! writers.
//!
//! Each kind declares its own lookup [`ScopePolicy`]; the store never
//! hard-codes where a lookup walks.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use url::Url;
use yangc_model::{ModuleIdentifier, QNameModule, SourceRef};

use crate::context::StmtId;
use crate::effective::TypeDefinition;

/// Identity of one typed symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Module identifier (name + declared revision) to its context,
    /// published at pre-linkage only.
    ///
    /// Keyed per revision so several revisions of one module name can
    /// coexist in a build; name-only lookups take the latest.
    PreLinkageModule,
    /// Module name to its declared namespace URI.
    ///
    /// Revisions of one module share the namespace, so re-publication
    /// across revisions is idempotent; a genuine divergence conflicts.
    ModuleNameToNamespace,
    /// A module's own prefix to its declared namespace URI.
    PrefixToNamespace,
    /// Full module identifier (name + revision) to its context.
    Module,
    /// Resolved qualified identity to the module context.
    NamespaceToModule,
    /// A module's own prefix to its qualified identity.
    PrefixToModule,
    /// Module identifier (name + revision) to its qualified identity.
    ///
    /// Like [`PreLinkageModule`](NamespaceKind::PreLinkageModule), keyed
    /// per revision; revision-agnostic imports take the latest.
    ModuleNameToModule,
    /// Import prefixes visible inside one module.
    ImportPrefixToModule,
    /// A module's own qualified identity.
    ModuleQName,
    /// Typedef name to the defining context, visible in the subtree.
    Typedef,
    /// Grouping name to the defining context, visible in the subtree.
    Grouping,
    /// A type statement's fully resolved definition.
    ResolvedType,
}

/// Where a lookup for a namespace kind searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// The statement's own store only.
    Local,
    /// The statement's own store, then each ancestor in turn.
    Ancestors,
    /// The store of the statement's module root.
    ModuleGlobal,
    /// The single store owned by the build itself.
    BuildGlobal,
}

impl NamespaceKind {
    /// The lookup scope this kind declares.
    pub fn scope(self) -> ScopePolicy {
        match self {
            NamespaceKind::PreLinkageModule
            | NamespaceKind::ModuleNameToNamespace
            | NamespaceKind::Module
            | NamespaceKind::NamespaceToModule
            | NamespaceKind::ModuleNameToModule => ScopePolicy::BuildGlobal,
            NamespaceKind::PrefixToNamespace
            | NamespaceKind::PrefixToModule
            | NamespaceKind::ImportPrefixToModule
            | NamespaceKind::ModuleQName => ScopePolicy::ModuleGlobal,
            NamespaceKind::Typedef | NamespaceKind::Grouping => ScopePolicy::Ancestors,
            NamespaceKind::ResolvedType => ScopePolicy::Local,
        }
    }

    /// Human-readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            NamespaceKind::PreLinkageModule => "pre-linkage-module",
            NamespaceKind::ModuleNameToNamespace => "module-name-to-namespace",
            NamespaceKind::PrefixToNamespace => "prefix-to-namespace",
            NamespaceKind::Module => "module",
            NamespaceKind::NamespaceToModule => "namespace-to-module",
            NamespaceKind::PrefixToModule => "prefix-to-module",
            NamespaceKind::ModuleNameToModule => "module-name-to-module",
            NamespaceKind::ImportPrefixToModule => "import-prefix-to-module",
            NamespaceKind::ModuleQName => "module-qname",
            NamespaceKind::Typedef => "typedef",
            NamespaceKind::Grouping => "grouping",
            NamespaceKind::ResolvedType => "resolved-type",
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Key of one namespace entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NsKey {
    /// Kinds with a single entry per store.
    Unit,
    /// Plain name or prefix.
    Str(String),
    /// Module identifier (name + revision).
    Module(ModuleIdentifier),
    /// Qualified module identity.
    QNameModule(QNameModule),
}

impl fmt::Display for NsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NsKey::Unit => write!(f, "()"),
            NsKey::Str(s) => write!(f, "{}", s),
            NsKey::Module(m) => write!(f, "{}", m),
            NsKey::QNameModule(q) => write!(f, "{}", q),
        }
    }
}

/// Value of one namespace entry.
#[derive(Debug, Clone, PartialEq)]
pub enum NsValue {
    /// Namespace URI.
    Uri(Url),
    /// Interned qualified module identity.
    QNameModule(Arc<QNameModule>),
    /// Module identifier.
    Module(ModuleIdentifier),
    /// Handle to another statement context.
    Stmt(StmtId),
    /// Resolved type definition.
    Type(TypeDefinition),
}

/// The dependency a blocked context is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyKey {
    /// Namespace kind that was consulted.
    pub kind: NamespaceKind,
    /// Key whose entry was absent.
    pub key: NsKey,
}

impl DependencyKey {
    /// Create a dependency key.
    pub fn new(kind: NamespaceKind, key: NsKey) -> Self {
        Self { kind, key }
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.key)
    }
}

/// Conflict raised by a divergent second write to the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceConflict {
    /// Namespace kind written to.
    pub kind: NamespaceKind,
    /// Conflicting key.
    pub key: NsKey,
    /// Value already present.
    pub existing: NsValue,
    /// Where the existing value was published.
    pub existing_at: SourceRef,
    /// Value that was rejected.
    pub attempted: NsValue,
}

impl fmt::Display for NamespaceConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflicting values for {}[{}]: {:?} vs {:?}",
            self.kind, self.key, self.existing, self.attempted
        )
    }
}

/// One published entry: the value plus where it was written.
#[derive(Debug, Clone, PartialEq)]
struct NsEntry {
    value: NsValue,
    at: SourceRef,
}

/// One context's (or the build root's) namespace entries.
#[derive(Debug, Clone, Default)]
pub struct NamespaceStore {
    entries: IndexMap<(NamespaceKind, NsKey), NsEntry>,
}

impl NamespaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an entry, recording the publisher's position.
    ///
    /// Re-publishing the identical value is idempotent; a different value
    /// for an existing key is a conflict carrying both positions.
    pub fn put(
        &mut self,
        kind: NamespaceKind,
        key: NsKey,
        value: NsValue,
        at: SourceRef,
    ) -> Result<(), NamespaceConflict> {
        match self.entries.get(&(kind, key.clone())) {
            Some(existing) if existing.value == value => Ok(()),
            Some(existing) => Err(NamespaceConflict {
                kind,
                key,
                existing: existing.value.clone(),
                existing_at: existing.at.clone(),
                attempted: value,
            }),
            None => {
                self.entries.insert((kind, key), NsEntry { value, at });
                Ok(())
            }
        }
    }

    /// Look up an entry in this store only.
    pub fn get(&self, kind: NamespaceKind, key: &NsKey) -> Option<&NsValue> {
        self.entries.get(&(kind, key.clone())).map(|e| &e.value)
    }

    /// Among entries of `kind` keyed by a module identifier with the
    /// given name, the one with the latest revision.
    pub fn get_latest(&self, kind: NamespaceKind, name: &str) -> Option<&NsValue> {
        self.entries
            .iter()
            .filter_map(|((k, key), entry)| match key {
                NsKey::Module(m) if *k == kind && m.name == name => {
                    Some((m.revision, &entry.value))
                }
                _ => None,
            })
            .max_by_key(|(revision, _)| *revision)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use yangc_model::{Revision, SourceIdentifier};

    fn uri(s: &str) -> NsValue {
        NsValue::Uri(Url::parse(s).unwrap())
    }

    fn at(line: u32) -> SourceRef {
        SourceRef::new(SourceIdentifier::new("acme", Revision::Undated), line, 1)
    }

    #[test]
    fn test_put_then_get() {
        let mut store = NamespaceStore::new();
        store
            .put(
                NamespaceKind::ModuleNameToNamespace,
                NsKey::Str("acme".into()),
                uri("urn:acme"),
                at(1),
            )
            .unwrap();
        assert_eq!(
            store.get(
                NamespaceKind::ModuleNameToNamespace,
                &NsKey::Str("acme".into())
            ),
            Some(&uri("urn:acme"))
        );
    }

    #[test]
    fn test_absent_entry_is_none_not_error() {
        let store = NamespaceStore::new();
        assert!(store
            .get(NamespaceKind::ModuleNameToModule, &NsKey::Str("x".into()))
            .is_none());
    }

    #[test]
    fn test_identical_rewrite_is_idempotent() {
        let mut store = NamespaceStore::new();
        let key = NsKey::Str("acme".into());
        store
            .put(
                NamespaceKind::ModuleNameToNamespace,
                key.clone(),
                uri("urn:acme"),
                at(1),
            )
            .unwrap();
        store
            .put(
                NamespaceKind::ModuleNameToNamespace,
                key,
                uri("urn:acme"),
                at(9),
            )
            .unwrap();
    }

    #[test]
    fn test_divergent_rewrite_conflicts_with_both_positions() {
        let mut store = NamespaceStore::new();
        let key = NsKey::Str("acme".into());
        store
            .put(
                NamespaceKind::ModuleNameToNamespace,
                key.clone(),
                uri("urn:acme"),
                at(2),
            )
            .unwrap();
        let err = store
            .put(
                NamespaceKind::ModuleNameToNamespace,
                key,
                uri("urn:other"),
                at(7),
            )
            .unwrap_err();
        assert_eq!(err.kind, NamespaceKind::ModuleNameToNamespace);
        assert_eq!(err.existing, uri("urn:acme"));
        assert_eq!(err.existing_at, at(2));
        assert_eq!(err.attempted, uri("urn:other"));
    }

    #[test]
    fn test_kinds_are_isolated() {
        let mut store = NamespaceStore::new();
        let key = NsKey::Str("p".into());
        store
            .put(
                NamespaceKind::PrefixToNamespace,
                key.clone(),
                uri("urn:a"),
                at(1),
            )
            .unwrap();
        // Same key under a different kind is a distinct entry.
        store
            .put(
                NamespaceKind::ImportPrefixToModule,
                key.clone(),
                uri("urn:b"),
                at(2),
            )
            .unwrap();
        assert_eq!(
            store.get(NamespaceKind::PrefixToNamespace, &key),
            Some(&uri("urn:a"))
        );
    }

    #[test]
    fn test_latest_selects_greatest_revision() {
        let mut store = NamespaceStore::new();
        let old = ModuleIdentifier::new("b", Revision::parse("2023-01-01").unwrap());
        let new = ModuleIdentifier::new("b", Revision::parse("2024-01-15").unwrap());
        store
            .put(
                NamespaceKind::PreLinkageModule,
                NsKey::Module(new),
                NsValue::Stmt(StmtId(1)),
                at(1),
            )
            .unwrap();
        store
            .put(
                NamespaceKind::PreLinkageModule,
                NsKey::Module(old),
                NsValue::Stmt(StmtId(2)),
                at(2),
            )
            .unwrap();
        assert_eq!(
            store.get_latest(NamespaceKind::PreLinkageModule, "b"),
            Some(&NsValue::Stmt(StmtId(1)))
        );
        assert!(store
            .get_latest(NamespaceKind::PreLinkageModule, "other")
            .is_none());
    }

    #[test]
    fn test_scope_policies_are_per_kind() {
        assert_eq!(
            NamespaceKind::ModuleNameToModule.scope(),
            ScopePolicy::BuildGlobal
        );
        assert_eq!(
            NamespaceKind::PrefixToModule.scope(),
            ScopePolicy::ModuleGlobal
        );
        assert_eq!(NamespaceKind::Typedef.scope(), ScopePolicy::Ancestors);
        assert_eq!(NamespaceKind::ResolvedType.scope(), ScopePolicy::Local);
    }
}
