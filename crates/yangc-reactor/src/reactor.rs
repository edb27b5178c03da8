//! The build scheduler.
//!
//! [`SchemaReactor`] owns one build: it turns raw statement trees into
//! contexts, drives every context through the phase pipeline in lock-step,
//! validates cardinality once the substatement sets are final, and freezes
//! the surviving contexts into an [`EffectiveModel`].
//!
//! Within a phase the scheduler runs rounds over the whole context set.
//! A context whose hook returns [`Progress::Blocked`] is retried in the
//! next round; the phase ends when no context is pending. A round in
//! which no context completes while some remain blocked is terminal and
//! produces a [`SchemaResolutionError`].

use std::sync::Arc;

use tracing::{debug, trace};
use yangc_model::{ModuleIdentifier, Revision, SourceIdentifier};

use crate::context::{BuildContext, StatementContext, StmtId};
use crate::effective::{EffectiveModel, EffectiveStatement};
use crate::error::{
    ErrorKind, ModuleImport, ReactorError, SchemaResolutionError, SourceError,
};
use crate::phase::{ModelPhase, Progress};
use crate::raw::RawStatement;
use crate::support::{StatementSupport, SupportRegistry};

/// Entry point for one schema build.
///
/// Sources are added in any order; declaration order never affects the
/// outcome, only the number of retry rounds.
pub struct SchemaReactor {
    registry: Arc<SupportRegistry>,
    sources: Vec<RawStatement>,
}

impl Default for SchemaReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaReactor {
    /// Create a reactor with the built-in statement supports.
    pub fn new() -> Self {
        Self::with_registry(SupportRegistry::with_builtins())
    }

    /// Create a reactor with a caller-assembled registry.
    pub fn with_registry(registry: SupportRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            sources: Vec::new(),
        }
    }

    /// Add one schema source's raw statement tree.
    pub fn add_source(&mut self, source: RawStatement) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Run the build to completion.
    ///
    /// Consumes the reactor; a failed build is not resumable, callers
    /// retry with a fresh reactor and an amended source set.
    pub fn build(self) -> Result<EffectiveModel, ReactorError> {
        let mut run = BuildRun::new(self.registry);

        let mut errors = Vec::new();
        for source in self.sources {
            run.create_source(&source, &mut errors);
        }
        if !errors.is_empty() {
            return Err(ReactorError::Invalid(errors));
        }

        for phase in [
            ModelPhase::PreLinkage,
            ModelPhase::Linkage,
            ModelPhase::StatementDefinition,
            ModelPhase::FullDeclaration,
        ] {
            run.execute_phase(phase)?;
        }

        let errors = run.validate_cardinality();
        if !errors.is_empty() {
            return Err(ReactorError::Invalid(errors));
        }

        run.freeze().map_err(|e| ReactorError::Invalid(vec![e]))
    }
}

/// Mutable state of one in-flight build.
struct BuildRun {
    registry: Arc<SupportRegistry>,
    build: BuildContext,
    /// Every context in creation (preorder) order, the round iteration order.
    order: Vec<StmtId>,
}

impl BuildRun {
    fn new(registry: Arc<SupportRegistry>) -> Self {
        Self {
            registry,
            build: BuildContext::default(),
            order: Vec::new(),
        }
    }

    /// Create the context subtree for one source root.
    ///
    /// Argument and keyword errors are collected, not short-circuited, so
    /// a single build reports every invalid statement across all sources.
    fn create_source(&mut self, source: &RawStatement, errors: &mut Vec<SourceError>) {
        if let Some(root) = self.create_context(source, None, None, errors) {
            self.build.roots.push(root);
        }
    }

    fn create_context(
        &mut self,
        raw: &RawStatement,
        parent: Option<StmtId>,
        root: Option<StmtId>,
        errors: &mut Vec<SourceError>,
    ) -> Option<StmtId> {
        let support = match self.registry.get(&raw.keyword) {
            Some(support) => support,
            None => {
                errors.push(SourceError::new(
                    ErrorKind::UnknownStatement,
                    raw.at.clone(),
                    format!("no statement support registered for '{}'", raw.keyword),
                ));
                return None;
            }
        };

        let argument = match support.parse_argument(raw.argument.as_deref(), &raw.at) {
            Ok(argument) => argument,
            Err(err) => {
                errors.push(err);
                return None;
            }
        };

        let id = StmtId(self.build.contexts.len());
        self.build.contexts.push(StatementContext {
            keyword: raw.keyword.clone(),
            raw_argument: raw.argument.clone(),
            argument,
            parent,
            root: root.unwrap_or(id),
            substatements: Vec::new(),
            phase: ModelPhase::Init,
            blocked_on: None,
            at: raw.at.clone(),
            namespaces: Default::default(),
            support,
        });
        self.order.push(id);

        let subtree_root = root.unwrap_or(id);
        for child in &raw.children {
            if let Some(child_id) = self.create_context(child, Some(id), Some(subtree_root), errors)
            {
                self.build.get_mut(id).substatements.push(child_id);
            }
        }
        Some(id)
    }

    /// Drive every context through one phase, retrying blocked contexts
    /// round by round.
    fn execute_phase(&mut self, phase: ModelPhase) -> Result<(), ReactorError> {
        let mut round = 0usize;
        loop {
            round += 1;
            let mut pending = 0usize;
            let mut completed = 0usize;

            for i in 0..self.order.len() {
                let id = self.order[i];
                if self.build.get(id).phase >= phase {
                    continue;
                }
                let support = Arc::clone(&self.build.get(id).support);
                let mut handle = self.build.stmt(id);
                let outcome = dispatch(&*support, phase, &mut handle)
                    .map_err(|e| ReactorError::Invalid(vec![e]))?;
                match outcome {
                    Progress::Done => {
                        let ctx = self.build.get_mut(id);
                        ctx.phase = phase;
                        ctx.blocked_on = None;
                        completed += 1;
                    }
                    Progress::Blocked(key) => {
                        trace!(phase = %phase, stmt = %self.build.get(id).at, dep = %key, "blocked");
                        self.build.get_mut(id).blocked_on = Some(key);
                        pending += 1;
                    }
                }
            }

            debug!(phase = %phase, round, completed, pending, "phase round");

            if pending == 0 {
                return Ok(());
            }
            if completed == 0 {
                return Err(self.resolution_failure(phase).into());
            }
        }
    }

    /// Build the terminal diagnostic for a no-progress round.
    fn resolution_failure(&self, phase: ModelPhase) -> SchemaResolutionError {
        let mut resolved = Vec::new();
        let mut unsatisfied = indexmap::IndexMap::new();
        let mut blocked_deps = Vec::new();

        for &root in &self.build.roots {
            let subtree = self.subtree(root);
            let complete = subtree.iter().all(|&id| self.build.get(id).phase >= phase);
            let source = self.source_identifier(root);
            if complete {
                resolved.push(source);
                continue;
            }

            let mut imports = Vec::new();
            for &id in &subtree {
                let ctx = self.build.get(id);
                let Some(dep) = &ctx.blocked_on else { continue };
                blocked_deps.push(format!("{} (at {})", dep, ctx.at));
                if ctx.keyword == "import" || ctx.keyword == "include" {
                    let name = ctx
                        .argument
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    let revision = self
                        .child_of(id, "revision-date")
                        .and_then(|c| self.build.get(c).argument.as_revision());
                    imports.push(ModuleImport {
                        module_name: name,
                        revision,
                        at: ctx.at.clone(),
                    });
                }
            }
            unsatisfied.insert(source, imports);
        }

        SchemaResolutionError {
            message: format!(
                "no progress in {} phase, blocked on: {}",
                phase,
                blocked_deps.join(", ")
            ),
            resolved,
            unsatisfied,
        }
    }

    /// Declared identity of one source root: module name plus the latest
    /// declared revision, or the undated sentinel.
    fn source_identifier(&self, root: StmtId) -> SourceIdentifier {
        let ctx = self.build.get(root);
        let name = ctx
            .argument
            .as_str()
            .unwrap_or(&ctx.at.source.name)
            .to_string();
        let revision = ctx
            .substatements
            .iter()
            .filter(|&&c| self.build.get(c).keyword == "revision")
            .filter_map(|&c| self.build.get(c).argument.as_revision())
            .max()
            .unwrap_or(Revision::Undated);
        SourceIdentifier::new(name, revision)
    }

    fn child_of(&self, id: StmtId, keyword: &str) -> Option<StmtId> {
        self.build
            .get(id)
            .substatements
            .iter()
            .copied()
            .find(|&c| self.build.get(c).keyword == keyword)
    }

    fn subtree(&self, root: StmtId) -> Vec<StmtId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.build.get(id).substatements.iter().copied());
        }
        out
    }

    /// Check every context's final substatement multiset against its
    /// declared cardinality table, collecting all violations.
    fn validate_cardinality(&self) -> Vec<SourceError> {
        let mut errors = Vec::new();
        for &id in &self.order {
            let ctx = self.build.get(id);
            let Some(validator) = ctx.support.substatement_validator() else {
                continue;
            };
            let children: Vec<&str> = ctx
                .substatements
                .iter()
                .map(|&c| self.build.get(c).keyword.as_str())
                .collect();
            errors.extend(validator.validate(&ctx.keyword, &ctx.at, &children));
        }
        errors
    }

    /// Freeze every source root bottom-up into the effective model.
    ///
    /// Submodules contribute to their parent module through namespaces and
    /// do not appear as model entries themselves.
    fn freeze(&self) -> Result<EffectiveModel, SourceError> {
        let mut model = EffectiveModel::default();
        for &root in &self.build.roots {
            let frozen = self.freeze_stmt(root)?;
            if let Some(detail) = frozen.as_module() {
                let id = ModuleIdentifier::new(
                    detail.name.clone(),
                    detail.qname_module.revision(),
                );
                debug!(module = %id, "froze module");
                model.modules.insert(id, frozen);
            }
        }
        Ok(model)
    }

    fn freeze_stmt(&self, id: StmtId) -> Result<EffectiveStatement, SourceError> {
        let substatements = self
            .build
            .get(id)
            .substatements
            .iter()
            .map(|&c| self.freeze_stmt(c))
            .collect::<Result<Vec<_>, _>>()?;
        let view = self.build.view(id);
        self.build.get(id).support.create_effective(&view, substatements)
    }
}

fn dispatch(
    support: &dyn StatementSupport,
    phase: ModelPhase,
    handle: &mut crate::context::StmtHandle<'_>,
) -> Result<Progress, SourceError> {
    match phase {
        ModelPhase::PreLinkage => support.on_pre_linkage(handle),
        ModelPhase::Linkage => support.on_linkage(handle),
        ModelPhase::StatementDefinition => support.on_statement_definition(handle),
        ModelPhase::FullDeclaration => support.on_full_declaration(handle),
        ModelPhase::Init | ModelPhase::EffectiveModel => Err(SourceError::new(
            ErrorKind::Internal,
            handle.view().source_ref(),
            format!("phase {} has no statement hook", phase),
        )),
    }
}
