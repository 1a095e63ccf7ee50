//! Permission matrix: (role, module) -> capability set
//!
//! Four independent capabilities per entry. A missing entry means every
//! capability is false; lookups never fail, a miss is an ordinary deny.

use actix_web::http::Method;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A named permission dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read a resource (GET)
    Read,
    /// Create a resource (POST)
    Add,
    /// Modify a resource (PUT, PATCH, DELETE)
    Update,
    /// See the resource in navigation; never required by any HTTP method
    See,
}

impl Capability {
    /// Capability demanded by an HTTP method
    ///
    /// DELETE is treated as a form of update; there is no separate delete
    /// capability. Any unmapped method is denied outright.
    pub fn for_method(method: &Method) -> Option<Capability> {
        match *method {
            Method::GET => Some(Capability::Read),
            Method::POST => Some(Capability::Add),
            Method::PUT | Method::PATCH | Method::DELETE => Some(Capability::Update),
            _ => None,
        }
    }
}

/// Capability set granted to one role on one module
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    /// Role the entry belongs to
    pub role_id: Uuid,
    /// Module the entry governs
    pub module_id: Uuid,
    /// GET allowed
    pub can_read: bool,
    /// POST allowed
    pub can_add: bool,
    /// PUT/PATCH/DELETE allowed
    pub can_update: bool,
    /// Visible in navigation
    pub can_see: bool,
}

impl PermissionEntry {
    /// Whether this entry grants `capability`
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => self.can_read,
            Capability::Add => self.can_add,
            Capability::Update => self.can_update,
            Capability::See => self.can_see,
        }
    }
}

/// Read-mostly (role, module) -> entry table
///
/// At most one entry per (role, module) pair. Writers are administrative
/// bulk edits; last write wins, no cross-store transaction.
#[derive(Debug, Default)]
pub struct PermissionMatrix {
    entries: RwLock<HashMap<(Uuid, Uuid), PermissionEntry>>,
}

impl PermissionMatrix {
    /// Create an empty matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for a (role, module) pair
    pub fn get(&self, role_id: Uuid, module_id: Uuid) -> Option<PermissionEntry> {
        self.entries.read().get(&(role_id, module_id)).copied()
    }

    /// Decide whether `role_id` may perform `method` on `module_id`
    ///
    /// Pure and side-effect free. An absent entry denies every method; an
    /// unrecognized method denies without a lookup.
    pub fn evaluate(&self, role_id: Uuid, module_id: Uuid, method: &Method) -> bool {
        let Some(capability) = Capability::for_method(method) else {
            return false;
        };
        self.get(role_id, module_id)
            .map(|entry| entry.grants(capability))
            .unwrap_or(false)
    }

    /// Replace every entry for a role in one administrative write
    ///
    /// Entries in `entries` whose role_id differs from `role_id` are
    /// ignored rather than written under the wrong key.
    pub fn replace_role(&self, role_id: Uuid, entries: Vec<PermissionEntry>) {
        let mut table = self.entries.write();
        table.retain(|(entry_role, _), _| *entry_role != role_id);
        for entry in entries {
            if entry.role_id == role_id {
                table.insert((entry.role_id, entry.module_id), entry);
            }
        }
    }

    /// Drop every entry referencing a deleted module
    pub fn remove_module(&self, module_id: Uuid) {
        self.entries
            .write()
            .retain(|(_, entry_module), _| *entry_module != module_id);
    }

    /// All entries for a role, for the management read endpoint
    pub fn entries_for_role(&self, role_id: Uuid) -> Vec<PermissionEntry> {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.role_id == role_id)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role_id: Uuid, module_id: Uuid, flags: (bool, bool, bool, bool)) -> PermissionEntry {
        PermissionEntry {
            role_id,
            module_id,
            can_read: flags.0,
            can_add: flags.1,
            can_update: flags.2,
            can_see: flags.3,
        }
    }

    #[test]
    fn method_mapping_is_fixed() {
        assert_eq!(Capability::for_method(&Method::GET), Some(Capability::Read));
        assert_eq!(Capability::for_method(&Method::POST), Some(Capability::Add));
        assert_eq!(Capability::for_method(&Method::PUT), Some(Capability::Update));
        assert_eq!(
            Capability::for_method(&Method::PATCH),
            Some(Capability::Update)
        );
        assert_eq!(
            Capability::for_method(&Method::DELETE),
            Some(Capability::Update)
        );
        assert_eq!(Capability::for_method(&Method::HEAD), None);
        assert_eq!(Capability::for_method(&Method::TRACE), None);
    }

    #[test]
    fn missing_entry_denies_every_method() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let module = Uuid::new_v4();

        for method in [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ] {
            assert!(!matrix.evaluate(role, module, &method), "{method} leaked");
        }
    }

    #[test]
    fn evaluate_selects_the_mapped_capability() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let module = Uuid::new_v4();
        matrix.replace_role(role, vec![entry(role, module, (true, false, true, true))]);

        assert!(matrix.evaluate(role, module, &Method::GET));
        assert!(!matrix.evaluate(role, module, &Method::POST));
        assert!(matrix.evaluate(role, module, &Method::PUT));
        assert!(matrix.evaluate(role, module, &Method::DELETE));
    }

    #[test]
    fn can_see_never_grants_a_method() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let module = Uuid::new_v4();
        matrix.replace_role(role, vec![entry(role, module, (false, false, false, true))]);

        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert!(!matrix.evaluate(role, module, &method));
        }
    }

    #[test]
    fn replace_role_is_a_full_replace() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let module_a = Uuid::new_v4();
        let module_b = Uuid::new_v4();

        matrix.replace_role(role, vec![entry(role, module_a, (true, true, true, true))]);
        matrix.replace_role(role, vec![entry(role, module_b, (true, false, false, true))]);

        // The old module_a entry is gone, not merged.
        assert!(matrix.get(role, module_a).is_none());
        assert!(matrix.evaluate(role, module_b, &Method::GET));
    }

    #[test]
    fn replace_role_leaves_other_roles_untouched() {
        let matrix = PermissionMatrix::new();
        let role_a = Uuid::new_v4();
        let role_b = Uuid::new_v4();
        let module = Uuid::new_v4();

        matrix.replace_role(role_a, vec![entry(role_a, module, (true, false, false, false))]);
        matrix.replace_role(role_b, vec![entry(role_b, module, (false, true, false, false))]);

        assert!(matrix.evaluate(role_a, module, &Method::GET));
        assert!(matrix.evaluate(role_b, module, &Method::POST));
    }

    #[test]
    fn replace_role_ignores_foreign_entries() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let other_role = Uuid::new_v4();
        let module = Uuid::new_v4();

        matrix.replace_role(
            role,
            vec![entry(other_role, module, (true, true, true, true))],
        );
        assert!(matrix.get(other_role, module).is_none());
        assert!(matrix.get(role, module).is_none());
    }

    #[test]
    fn remove_module_drops_orphaned_rows() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::new_v4();
        let module = Uuid::new_v4();
        let survivor = Uuid::new_v4();

        matrix.replace_role(
            role,
            vec![
                entry(role, module, (true, true, true, true)),
                entry(role, survivor, (true, false, false, false)),
            ],
        );
        matrix.remove_module(module);

        assert!(matrix.get(role, module).is_none());
        assert!(matrix.get(role, survivor).is_some());
    }
}
