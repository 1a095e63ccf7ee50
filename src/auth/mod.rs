//! Authentication and authorization
//!
//! Sessions, principals, the permission matrix, and the per-request
//! authorization gate.

pub mod gate;
pub mod matrix;
pub mod principal;
pub mod session;

pub use gate::{extract_bearer_token, AuthorizationGate, Decision, DenyReason};
pub use matrix::{Capability, PermissionEntry, PermissionMatrix};
pub use principal::{InMemoryDirectory, Principal, Role, RoleRef, UserDirectory};
pub use session::SessionStore;
