//! The frozen output model.
//!
//! Effective statements are produced once, at the end of the build, and
//! are immutable from then on. They own their subtree and never reference
//! the mutable build-time contexts, so they are freely shareable.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use yangc_model::{BuiltinType, ModuleIdentifier, NumericRange, QName, QNameModule};

use crate::argument::Argument;

/// A fully resolved type.
///
/// Structurally comparable: two independently computed restrictions with
/// identical base and bounds are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    /// Integer type with resolved bounds.
    Numeric(NumericTypeDefinition),
    /// Character data.
    String,
    /// True/false.
    Boolean,
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDefinition::Numeric(n) => write!(f, "{} {}", n.base, n.range),
            TypeDefinition::String => write!(f, "string"),
            TypeDefinition::Boolean => write!(f, "boolean"),
        }
    }
}

/// Resolved numeric type: built-in base plus effective bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericTypeDefinition {
    /// The built-in base type the restriction chain bottoms out in.
    pub base: BuiltinType,
    /// Effective `[min, max]` after all narrowing.
    pub range: NumericRange,
    /// Canonical description of the base type.
    pub description: String,
}

impl NumericTypeDefinition {
    /// The unrestricted definition of a built-in numeric type.
    pub fn of(base: BuiltinType) -> Option<Self> {
        Some(Self {
            base,
            range: base.numeric_range()?,
            description: base.description(),
        })
    }
}

/// Kind-specific derived attributes of an effective statement.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectiveDetail {
    /// No derived attributes.
    None,
    /// A module root.
    Module(ModuleDetail),
    /// A data node (container, list, leaf-list).
    Node {
        /// The node's qualified name under its module.
        qname: QName,
    },
    /// A leaf with a resolved type.
    Leaf(LeafDetail),
    /// A type statement's resolution.
    Type(TypeDefinition),
}

/// Derived attributes of an effective module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDetail {
    /// Declared module name.
    pub name: String,
    /// Resolved qualified identity (namespace + effective revision).
    pub qname_module: Arc<QNameModule>,
    /// Declared prefix.
    pub prefix: String,
}

/// Derived attributes of an effective leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDetail {
    /// The leaf's qualified name under its module.
    pub qname: QName,
    /// Resolved type of the leaf's value.
    pub type_def: TypeDefinition,
}

/// The frozen counterpart of one statement context.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveStatement {
    /// Statement keyword.
    pub keyword: String,
    /// Typed argument.
    pub argument: Argument,
    /// Effective substatements, declaration order.
    pub substatements: Vec<EffectiveStatement>,
    /// Kind-specific derived attributes.
    pub detail: EffectiveDetail,
}

impl EffectiveStatement {
    /// Create an effective statement with no derived attributes.
    pub fn new(
        keyword: impl Into<String>,
        argument: Argument,
        substatements: Vec<EffectiveStatement>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            argument,
            substatements,
            detail: EffectiveDetail::None,
        }
    }

    /// Attach derived attributes.
    pub fn with_detail(mut self, detail: EffectiveDetail) -> Self {
        self.detail = detail;
        self
    }

    /// First substatement with the given keyword.
    pub fn substatement(&self, keyword: &str) -> Option<&EffectiveStatement> {
        self.substatements.iter().find(|s| s.keyword == keyword)
    }

    /// All substatements with the given keyword, declaration order.
    pub fn substatements_named<'a>(
        &'a self,
        keyword: &'a str,
    ) -> impl Iterator<Item = &'a EffectiveStatement> {
        self.substatements
            .iter()
            .filter(move |s| s.keyword == keyword)
    }

    /// Descend through nested substatements by keyword path.
    pub fn find(&self, path: &[&str]) -> Option<&EffectiveStatement> {
        let mut cur = self;
        for keyword in path {
            cur = cur.substatement(keyword)?;
        }
        Some(cur)
    }

    /// The module detail, when this is an effective module.
    pub fn as_module(&self) -> Option<&ModuleDetail> {
        match &self.detail {
            EffectiveDetail::Module(m) => Some(m),
            _ => None,
        }
    }

    /// The leaf detail, when this is an effective leaf.
    pub fn as_leaf(&self) -> Option<&LeafDetail> {
        match &self.detail {
            EffectiveDetail::Leaf(l) => Some(l),
            _ => None,
        }
    }

    /// The resolved type, when this is an effective type statement.
    pub fn as_type(&self) -> Option<&TypeDefinition> {
        match &self.detail {
            EffectiveDetail::Type(t) => Some(t),
            _ => None,
        }
    }
}

/// The complete output of one build: resolved module identity to frozen
/// effective module statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveModel {
    /// Modules in source-set declaration order.
    pub modules: IndexMap<ModuleIdentifier, EffectiveStatement>,
}

impl EffectiveModel {
    /// Look up a module by exact identifier.
    pub fn get(&self, id: &ModuleIdentifier) -> Option<&EffectiveStatement> {
        self.modules.get(id)
    }

    /// Look up a module by name, any revision (first declared wins).
    pub fn module(&self, name: &str) -> Option<&EffectiveStatement> {
        self.modules
            .iter()
            .find(|(id, _)| id.name == name)
            .map(|(_, m)| m)
    }
}
