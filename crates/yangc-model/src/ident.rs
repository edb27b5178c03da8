//! Qualified identity types.
//!
//! Every schema node is identified by a [`QName`]: a local name qualified
//! by the [`QNameModule`] (namespace URI + revision) of its defining
//! module. Qualified names are interned so equal values share one
//! allocation and compare by pointer-cheap structural equality.
//!
//! [`ModuleIdentifier`] names a module by (name, revision) before its
//! namespace is known; it is the key of the effective model.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::revision::Revision;

/// Namespace-and-revision qualification of a module.
///
/// Two modules are the same qualification unit exactly when both the
/// namespace URI and the effective revision are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QNameModule {
    namespace: Url,
    revision: Revision,
}

impl QNameModule {
    /// Create a new qualification from a namespace URI and revision.
    pub fn new(namespace: Url, revision: Revision) -> Self {
        Self {
            namespace,
            revision,
        }
    }

    /// Intern this value, returning the canonical shared instance.
    pub fn intern(self) -> Arc<QNameModule> {
        static POOL: OnceLock<Mutex<HashMap<QNameModule, Arc<QNameModule>>>> = OnceLock::new();
        let pool = POOL.get_or_init(|| Mutex::new(HashMap::new()));
        let mut pool = pool.lock().unwrap_or_else(|e| e.into_inner());
        pool.entry(self.clone())
            .or_insert_with(|| Arc::new(self))
            .clone()
    }

    /// The module's namespace URI.
    pub fn namespace(&self) -> &Url {
        &self.namespace
    }

    /// The module's effective revision.
    pub fn revision(&self) -> Revision {
        self.revision
    }
}

impl fmt::Display for QNameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}?revision={})", self.namespace, self.revision)
    }
}

/// Qualified name of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    module: Arc<QNameModule>,
    local_name: String,
}

impl QName {
    /// Create a qualified name under the given module.
    pub fn new(module: Arc<QNameModule>, local_name: impl Into<String>) -> Self {
        Self {
            module,
            local_name: local_name.into(),
        }
    }

    /// The qualifying module.
    pub fn module(&self) -> &Arc<QNameModule> {
        &self.module
    }

    /// The unqualified local name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.module, self.local_name)
    }
}

/// Identity of a module independent of namespace resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIdentifier {
    /// Declared module name.
    pub name: String,
    /// Effective revision (latest declared, or the undated sentinel).
    pub revision: Revision,
}

impl ModuleIdentifier {
    /// Create a module identifier.
    pub fn new(name: impl Into<String>, revision: Revision) -> Self {
        Self {
            name: name.into(),
            revision,
        }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Revision::Undated => write!(f, "{}", self.name),
            rev => write!(f, "{}@{}", self.name, rev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_intern_returns_same_instance() {
        let a = QNameModule::new(ns("urn:test:intern"), Revision::Undated).intern();
        let b = QNameModule::new(ns("urn:test:intern"), Revision::Undated).intern();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_intern_distinguishes_revisions() {
        let rev = Revision::parse("2015-06-07").unwrap();
        let undated = QNameModule::new(ns("urn:test:rev"), Revision::Undated).intern();
        let dated = QNameModule::new(ns("urn:test:rev"), rev).intern();
        assert!(!Arc::ptr_eq(&undated, &dated));
        assert_ne!(undated, dated);
    }

    #[test]
    fn test_qname_equality_is_structural() {
        let module = QNameModule::new(ns("urn:test:q"), Revision::Undated).intern();
        let a = QName::new(module.clone(), "leaf-a");
        let b = QName::new(module, "leaf-a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_module_identifier_display() {
        let undated = ModuleIdentifier::new("acme", Revision::Undated);
        assert_eq!(undated.to_string(), "acme");

        let dated = ModuleIdentifier::new("acme", Revision::parse("2015-06-07").unwrap());
        assert_eq!(dated.to_string(), "acme@2015-06-07");
    }
}
