//! Module registry: the tree of path-addressable back-office resources
//!
//! Modules form a forest through a nullable parent id (an arena of nodes,
//! not object pointers). The authorization pipeline only reads the
//! registry; administrative edits go through [`ModuleRegistry::insert`] and
//! [`ModuleRegistry::remove`] and are safe to interleave with concurrent
//! request-side lookups.

pub mod resolver;

pub use resolver::PathResolver;

use crate::utils::error::{GateError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A registered, path-addressable resource node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Module id, the permission-matrix key
    pub id: Uuid,
    /// Name shown in navigation
    pub display_name: String,
    /// Stable internal name
    pub internal_name: String,
    /// Depth hint; informational, the tree is derived from parent ids
    pub level: i32,
    /// Sibling ordering
    pub order_no: i32,
    /// Request path governed by this module; None for pure grouping nodes.
    /// Children do not inherit or extend this string, each module's
    /// effective path is exactly its own.
    pub canonical_path: Option<String>,
    /// Parent module, None for roots
    pub parent_id: Option<Uuid>,
    /// Organizational node rather than a leaf resource
    pub is_group: bool,
    /// UI visibility hint; irrelevant to authorization
    pub visible: bool,
}

/// A module with its children, as returned by [`ModuleRegistry::build_tree`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNode {
    /// The module itself
    #[serde(flatten)]
    pub module: Module,
    /// Child nodes sorted by order_no
    pub children: Vec<ModuleNode>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_id: HashMap<Uuid, Module>,
    by_path: HashMap<String, Uuid>,
}

/// Read-mostly module store with a unique canonical-path index
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    inner: RwLock<RegistryInner>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive lookup by canonical path
    ///
    /// A path-index entry whose module has vanished is a miss, not an
    /// error; deletes must never leave the resolver pointing at a dangling
    /// id.
    pub fn find_by_path(&self, path: &str) -> Option<Module> {
        let inner = self.inner.read();
        let id = inner.by_path.get(path)?;
        inner.by_id.get(id).cloned()
    }

    /// Lookup by id
    pub fn find_by_id(&self, id: Uuid) -> Option<Module> {
        self.inner.read().by_id.get(&id).cloned()
    }

    /// All modules, siblings grouped under their parent and sorted by
    /// order_no
    pub fn list_all(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = self.inner.read().by_id.values().cloned().collect();
        modules.sort_by(|a, b| {
            a.parent_id
                .cmp(&b.parent_id)
                .then(a.order_no.cmp(&b.order_no))
                .then(a.id.cmp(&b.id))
        });
        modules
    }

    /// Group modules by parent id into a forest
    ///
    /// Roots are modules with no parent id, plus any module whose parent id
    /// points at a module that does not exist: orphans become roots rather
    /// than an error, availability wins over referential integrity here.
    pub fn build_tree(&self) -> Vec<ModuleNode> {
        let inner = self.inner.read();

        let mut children_of: HashMap<Uuid, Vec<&Module>> = HashMap::new();
        let mut roots: Vec<&Module> = Vec::new();
        for module in inner.by_id.values() {
            match module.parent_id {
                Some(parent) if inner.by_id.contains_key(&parent) => {
                    children_of.entry(parent).or_default().push(module);
                }
                _ => roots.push(module),
            }
        }

        fn attach(module: &Module, children_of: &HashMap<Uuid, Vec<&Module>>) -> ModuleNode {
            let mut children: Vec<&Module> = children_of
                .get(&module.id)
                .map(|v| v.to_vec())
                .unwrap_or_default();
            children.sort_by_key(|child| (child.order_no, child.id));
            ModuleNode {
                module: module.clone(),
                children: children
                    .into_iter()
                    .map(|child| attach(child, children_of))
                    .collect(),
            }
        }

        roots.sort_by_key(|module| (module.order_no, module.id));
        roots
            .into_iter()
            .map(|module| attach(module, &children_of))
            .collect()
    }

    /// Insert or update a module (administrative)
    ///
    /// Enforces canonical-path uniqueness among non-null entries.
    pub fn insert(&self, module: Module) -> Result<()> {
        let mut inner = self.inner.write();

        if let Some(path) = &module.canonical_path {
            if let Some(existing) = inner.by_path.get(path) {
                if *existing != module.id {
                    return Err(GateError::Conflict(format!(
                        "canonical path {path:?} is already registered"
                    )));
                }
            }
        }

        // An update may move or clear the module's canonical path.
        let stale_path = inner.by_id.get(&module.id).and_then(|previous| {
            if previous.canonical_path != module.canonical_path {
                previous.canonical_path.clone()
            } else {
                None
            }
        });
        if let Some(old_path) = stale_path {
            inner.by_path.remove(&old_path);
        }

        if let Some(path) = module.canonical_path.clone() {
            inner.by_path.insert(path, module.id);
        }
        inner.by_id.insert(module.id, module);
        Ok(())
    }

    /// Remove a module (administrative); idempotent
    ///
    /// Returns the removed module so the caller can clean up its
    /// permission-matrix rows.
    pub fn remove(&self, id: Uuid) -> Option<Module> {
        let mut inner = self.inner.write();
        let module = inner.by_id.remove(&id)?;
        if let Some(path) = &module.canonical_path {
            inner.by_path.remove(path);
        }
        Some(module)
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }
}

#[cfg(test)]
mod tests;
