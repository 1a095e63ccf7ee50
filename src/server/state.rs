//! Application state shared across HTTP handlers

use crate::auth::{AuthorizationGate, PermissionMatrix, SessionStore, UserDirectory};
use crate::config::Config;
use crate::registry::ModuleRegistry;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are Arc'd; cloning the state is cheap and every clone sees
/// the same live stores.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Session store (token -> user id)
    pub sessions: Arc<SessionStore>,
    /// External account-store collaborator
    pub directory: Arc<dyn UserDirectory>,
    /// Module registry
    pub registry: Arc<ModuleRegistry>,
    /// Permission matrix
    pub matrix: Arc<PermissionMatrix>,
    /// The per-request authorization gate
    pub gate: AuthorizationGate,
}

impl AppState {
    /// Assemble the state and the gate over fresh stores
    pub fn new(config: Config, directory: Arc<dyn UserDirectory>) -> Self {
        Self::with_stores(
            config,
            directory,
            Arc::new(SessionStore::new()),
            Arc::new(ModuleRegistry::new()),
            Arc::new(PermissionMatrix::new()),
        )
    }

    /// Assemble the state over pre-populated stores
    pub fn with_stores(
        config: Config,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<SessionStore>,
        registry: Arc<ModuleRegistry>,
        matrix: Arc<PermissionMatrix>,
    ) -> Self {
        let gate = AuthorizationGate::new(
            config.authorization.clone(),
            Arc::clone(&sessions),
            Arc::clone(&directory),
            Arc::clone(&registry),
            Arc::clone(&matrix),
        );
        Self {
            config: Arc::new(config),
            sessions,
            directory,
            registry,
            matrix,
            gate,
        }
    }
}
