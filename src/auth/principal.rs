//! Principals, roles, and the user-directory collaborator seam
//!
//! The gate only ever needs two things from the surrounding back office:
//! "who is this user id" and "do these login credentials check out". Both
//! are behind [`UserDirectory`] so the pipeline stays independent of the
//! account store's persistence.

use crate::utils::error::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A named set of permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Role id
    pub id: Uuid,
    /// Unique role name; "ADMIN" (case-insensitive) bypasses all checks
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// The role attached to a resolved principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    /// Role id, the permission-matrix key
    pub id: Uuid,
    /// Role name, consulted only for the admin bypass
    pub name: String,
}

/// An authenticated user as seen by the gate
///
/// Resolved once per request; the role id and name are stable for the
/// duration of that request's authorization decision.
#[derive(Debug, Clone)]
pub struct Principal {
    /// User id
    pub user_id: Uuid,
    /// Assigned role, if any
    pub role: Option<RoleRef>,
    /// Whether the account is active
    pub active: bool,
}

/// External account-store contract
///
/// Lookups are synchronous, fully-materialized reads; implementations must
/// be safe to share across request-handling tasks.
pub trait UserDirectory: Send + Sync {
    /// Resolve a user id to a principal; `Ok(None)` for an unknown user
    fn find_principal(&self, user_id: Uuid) -> Result<Option<Principal>>;

    /// Verify login credentials; `Ok(Some(user_id))` on success
    ///
    /// Credential hashing is the account store's concern, not the gate's.
    fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<Uuid>>;
}

/// In-memory directory used by the demo wiring and tests
#[derive(Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

#[derive(Default)]
struct DirectoryInner {
    principals: HashMap<Uuid, Principal>,
    credentials: HashMap<String, (String, Uuid)>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal
    pub fn insert_principal(&self, principal: Principal) {
        self.inner
            .write()
            .principals
            .insert(principal.user_id, principal);
    }

    /// Register login credentials for a user
    pub fn insert_credentials(&self, username: &str, password: &str, user_id: Uuid) {
        self.inner
            .write()
            .credentials
            .insert(username.to_string(), (password.to_string(), user_id));
    }
}

impl UserDirectory for InMemoryDirectory {
    fn find_principal(&self, user_id: Uuid) -> Result<Option<Principal>> {
        Ok(self.inner.read().principals.get(&user_id).cloned())
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<Uuid>> {
        let inner = self.inner.read();
        Ok(inner
            .credentials
            .get(username)
            .filter(|(stored, _)| stored == password)
            .map(|(_, user_id)| *user_id))
    }
}
