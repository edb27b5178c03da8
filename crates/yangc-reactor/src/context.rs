//! Statement context tree.
//!
//! Contexts live in an arena owned by one build and address each other by
//! [`StmtId`] handles: parents hold child handles, children hold their
//! parent's handle, and namespace entries store handles, never owning
//! references. This keeps the mutually referencing tree free of ownership
//! cycles and lets the freeze pass replace contexts wholesale.

use std::sync::Arc;

use yangc_model::SourceRef;

use crate::argument::Argument;
use crate::error::{ErrorKind, SourceError};
use crate::namespace::{NamespaceKind, NamespaceStore, NsKey, NsValue, ScopePolicy};
use crate::phase::ModelPhase;
use crate::support::StatementSupport;

/// Handle to one statement context within a build's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub(crate) usize);

/// One occurrence of a statement in source, mutable during the build.
#[derive(Clone)]
pub(crate) struct StatementContext {
    /// Statement keyword.
    pub(crate) keyword: String,
    /// Raw argument as written.
    pub(crate) raw_argument: Option<String>,
    /// Typed argument, parsed at creation.
    pub(crate) argument: Argument,
    /// Parent context; `None` for source roots.
    pub(crate) parent: Option<StmtId>,
    /// Root of the owning source tree (self for roots).
    pub(crate) root: StmtId,
    /// Substatements, append-only, declaration order.
    pub(crate) substatements: Vec<StmtId>,
    /// Last phase this context completed.
    pub(crate) phase: ModelPhase,
    /// Dependency the context is currently blocked on, for reporting.
    pub(crate) blocked_on: Option<crate::namespace::DependencyKey>,
    /// Source position.
    pub(crate) at: SourceRef,
    /// Per-context namespace entries.
    pub(crate) namespaces: NamespaceStore,
    /// Registered handler for this keyword.
    pub(crate) support: Arc<dyn StatementSupport>,
}

/// Arena of contexts plus the build-global namespace store.
///
/// One build owns exactly one `BuildContext`; builds share no mutable
/// state with each other.
#[derive(Default)]
pub struct BuildContext {
    pub(crate) contexts: Vec<StatementContext>,
    pub(crate) roots: Vec<StmtId>,
    pub(crate) global: NamespaceStore,
}

impl BuildContext {
    pub(crate) fn get(&self, id: StmtId) -> &StatementContext {
        &self.contexts[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: StmtId) -> &mut StatementContext {
        &mut self.contexts[id.0]
    }

    /// Read-only view of one context.
    pub fn view(&self, id: StmtId) -> StmtView<'_> {
        StmtView { build: self, id }
    }

    /// Mutable handle to one context, used by phase hooks.
    pub fn stmt(&mut self, id: StmtId) -> StmtHandle<'_> {
        StmtHandle { build: self, id }
    }
}

/// Read-only access to a context and its surrounding tree.
#[derive(Clone, Copy)]
pub struct StmtView<'a> {
    pub(crate) build: &'a BuildContext,
    pub(crate) id: StmtId,
}

impl<'a> StmtView<'a> {
    /// This context's handle.
    pub fn id(&self) -> StmtId {
        self.id
    }

    /// Statement keyword.
    pub fn keyword(&self) -> &'a str {
        &self.build.get(self.id).keyword
    }

    /// Typed argument.
    pub fn argument(&self) -> &'a Argument {
        &self.build.get(self.id).argument
    }

    /// Source position of the statement.
    pub fn source_ref(&self) -> SourceRef {
        self.build.get(self.id).at.clone()
    }

    /// Parent context, if any.
    pub fn parent(&self) -> Option<StmtId> {
        self.build.get(self.id).parent
    }

    /// Substatement handles in declaration order.
    pub fn substatements(&self) -> Vec<StmtId> {
        self.build.get(self.id).substatements.clone()
    }

    /// Keyword of another context.
    pub fn keyword_of(&self, id: StmtId) -> &'a str {
        &self.build.get(id).keyword
    }

    /// Typed argument of another context.
    pub fn argument_of(&self, id: StmtId) -> &'a Argument {
        &self.build.get(id).argument
    }

    /// First substatement of this context with the given keyword.
    pub fn find_child(&self, keyword: &str) -> Option<StmtId> {
        self.find_child_of(self.id, keyword)
    }

    /// First substatement of `id` with the given keyword.
    pub fn find_child_of(&self, id: StmtId, keyword: &str) -> Option<StmtId> {
        self.build
            .get(id)
            .substatements
            .iter()
            .copied()
            .find(|&c| self.build.get(c).keyword == keyword)
    }

    /// Argument of the first substatement with the given keyword.
    pub fn child_argument(&self, keyword: &str) -> Option<&'a Argument> {
        self.find_child(keyword).map(|c| self.argument_of(c))
    }

    /// Arguments of every substatement with the given keyword.
    pub fn child_arguments(&self, keyword: &str) -> Vec<&'a Argument> {
        self.build
            .get(self.id)
            .substatements
            .iter()
            .filter(|&&c| self.build.get(c).keyword == keyword)
            .map(|&c| self.argument_of(c))
            .collect()
    }

    /// Look up a namespace entry relative to this context.
    ///
    /// The walk is dictated by the kind's declared scope policy; absence
    /// means "not yet published", never an error.
    pub fn get_ns(&self, kind: NamespaceKind, key: &NsKey) -> Option<NsValue> {
        self.get_ns_of(self.id, kind, key)
    }

    /// Look up a namespace entry relative to another context.
    pub fn get_ns_of(&self, id: StmtId, kind: NamespaceKind, key: &NsKey) -> Option<NsValue> {
        match kind.scope() {
            ScopePolicy::Local => self.build.get(id).namespaces.get(kind, key).cloned(),
            ScopePolicy::Ancestors => {
                let mut cur = Some(id);
                while let Some(c) = cur {
                    if let Some(v) = self.build.get(c).namespaces.get(kind, key) {
                        return Some(v.clone());
                    }
                    cur = self.build.get(c).parent;
                }
                None
            }
            ScopePolicy::ModuleGlobal => {
                let root = self.build.get(id).root;
                self.build.get(root).namespaces.get(kind, key).cloned()
            }
            ScopePolicy::BuildGlobal => self.build.global.get(kind, key).cloned(),
        }
    }

    /// Among module-identifier-keyed entries of `kind` with the given
    /// module name, the value published for the latest revision.
    pub fn get_ns_latest(&self, kind: NamespaceKind, name: &str) -> Option<NsValue> {
        match kind.scope() {
            ScopePolicy::BuildGlobal => self.build.global.get_latest(kind, name).cloned(),
            _ => {
                let root = self.build.get(self.id).root;
                self.build.get(root).namespaces.get_latest(kind, name).cloned()
            }
        }
    }
}

/// Mutable access to a context during phase hooks.
///
/// Handlers mutate the tree only through the namespace store; sibling
/// contexts are never touched directly.
pub struct StmtHandle<'a> {
    pub(crate) build: &'a mut BuildContext,
    pub(crate) id: StmtId,
}

impl<'a> StmtHandle<'a> {
    /// Read-only view of the same context.
    pub fn view(&self) -> StmtView<'_> {
        StmtView {
            build: self.build,
            id: self.id,
        }
    }

    /// This context's handle.
    pub fn id(&self) -> StmtId {
        self.id
    }

    /// Publish a namespace entry, routed by the kind's scope policy.
    ///
    /// `Local` and `Ancestors` kinds publish on this context;
    /// `ModuleGlobal` on the module root; `BuildGlobal` on the build.
    pub fn put_ns(
        &mut self,
        kind: NamespaceKind,
        key: NsKey,
        value: NsValue,
    ) -> Result<(), SourceError> {
        let target = match kind.scope() {
            ScopePolicy::ModuleGlobal => PutTarget::Stmt(self.build.get(self.id).root),
            ScopePolicy::BuildGlobal => PutTarget::Global,
            ScopePolicy::Local | ScopePolicy::Ancestors => PutTarget::Stmt(self.id),
        };
        self.put_ns_at(target, kind, key, value)
    }

    /// Publish an `Ancestors`-scoped entry on the parent context, making
    /// it visible to this statement's siblings (typedef, grouping).
    pub fn put_ns_on_parent(
        &mut self,
        kind: NamespaceKind,
        key: NsKey,
        value: NsValue,
    ) -> Result<(), SourceError> {
        let target = match self.build.get(self.id).parent {
            Some(parent) => PutTarget::Stmt(parent),
            None => PutTarget::Stmt(self.id),
        };
        self.put_ns_at(target, kind, key, value)
    }

    fn put_ns_at(
        &mut self,
        target: PutTarget,
        kind: NamespaceKind,
        key: NsKey,
        value: NsValue,
    ) -> Result<(), SourceError> {
        let at = self.build.get(self.id).at.clone();
        let store = match target {
            PutTarget::Global => &mut self.build.global,
            PutTarget::Stmt(id) => &mut self.build.get_mut(id).namespaces,
        };
        store.put(kind, key, value, at.clone()).map_err(|conflict| {
            SourceError::new(ErrorKind::NamespaceConflict, at, conflict.to_string())
                .with_label(conflict.existing_at, "first published here")
        })
    }
}

enum PutTarget {
    Global,
    Stmt(StmtId),
}
