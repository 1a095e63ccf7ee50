//! # backoffice-gate
//!
//! Request authorization gateway for a multi-module back office. Every
//! inbound API call is mapped, without per-route static configuration, to a
//! hierarchical "module" resource and checked against a per-role capability
//! matrix before it reaches business logic.
//!
//! The pipeline:
//!
//! 1. **Session store** resolves the opaque bearer token to a user id.
//! 2. The **user directory** collaborator materializes the principal and
//!    role; the ADMIN role bypasses everything else.
//! 3. The **path resolver** normalizes the request path (prefix and query
//!    stripping, trailing-identifier removal, alias table) and resolves it
//!    against the **module registry** — exact match first, then the nearest
//!    enclosing parent path.
//! 4. The **permission matrix** maps the HTTP method to one of four
//!    capabilities (read/add/update/see) and looks up the (role, module)
//!    entry. Anything missing denies: the gate fails closed.
//!
//! ```rust,no_run
//! use backoffice_gate::auth::InMemoryDirectory;
//! use backoffice_gate::config::Config;
//! use backoffice_gate::server::run_server;
//! use std::sync::Arc;
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let directory = Arc::new(InMemoryDirectory::new());
//!     run_server(Config::default(), directory).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod registry;
pub mod server;
pub mod utils;

pub use auth::{AuthorizationGate, Decision, DenyReason};
pub use config::Config;
pub use registry::{Module, ModuleRegistry, PathResolver};
pub use utils::error::{GateError, Result};
