//! The authorization gate
//!
//! Per-request orchestration: authenticate the bearer token, apply the
//! bypass rules, resolve the request path to a module, and evaluate the
//! permission matrix. The gate is synchronous, holds no per-request state,
//! and fails closed: every miss, misconfiguration, or collaborator fault
//! becomes a deny, never an allow.

use crate::auth::matrix::PermissionMatrix;
use crate::auth::principal::UserDirectory;
use crate::auth::session::SessionStore;
use crate::config::AuthorizationConfig;
use crate::registry::{ModuleRegistry, PathResolver};
use actix_web::http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of gating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// OPTIONS preflight; never authorization-gated
    BypassedOptions,
    /// Path is on the public allowlist
    BypassedAllowlist,
    /// Path is outside the protected namespace
    OutsideNamespace,
    /// Request may proceed to the business handler
    Allowed,
    /// Request is rejected
    Denied(DenyReason),
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Missing, malformed, or unresolvable bearer token
    Unauthenticated,
    /// Authenticated principal carries no role
    NoRole,
    /// No module governs the request path
    NoModule,
    /// The role lacks the capability the method demands
    NoPermission,
    /// Evaluation could not complete
    Internal,
}

impl Decision {
    /// Whether the request may proceed downstream
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Denied(_))
    }
}

impl DenyReason {
    /// HTTP status for the deny response
    pub fn status(&self) -> StatusCode {
        match self {
            DenyReason::Unauthenticated => StatusCode::UNAUTHORIZED,
            DenyReason::NoRole | DenyReason::NoModule | DenyReason::NoPermission => {
                StatusCode::FORBIDDEN
            }
            DenyReason::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short sanitized message for the deny body
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "Invalid or expired token",
            DenyReason::NoRole => "No role assigned to this account",
            DenyReason::NoModule => "Resource is not registered for access",
            DenyReason::NoPermission => "Insufficient permissions for this operation",
            DenyReason::Internal => "Authorization could not be completed",
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// Anything other than a well-formed bearer header with a non-empty token
/// is None; a malformed header is just "no credentials".
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The per-request authorization pipeline
#[derive(Clone)]
pub struct AuthorizationGate {
    config: AuthorizationConfig,
    sessions: Arc<SessionStore>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<ModuleRegistry>,
    matrix: Arc<PermissionMatrix>,
    resolver: PathResolver,
}

impl AuthorizationGate {
    /// Assemble the gate from its collaborators
    pub fn new(
        config: AuthorizationConfig,
        sessions: Arc<SessionStore>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<ModuleRegistry>,
        matrix: Arc<PermissionMatrix>,
    ) -> Self {
        let resolver = PathResolver::new(config.api_prefix.clone(), config.path_aliases.clone());
        Self {
            config,
            sessions,
            directory,
            registry,
            matrix,
            resolver,
        }
    }

    /// Decide whether a request may proceed
    ///
    /// `authorization` is the raw `Authorization` header value, if present.
    /// Transitions are evaluated in order, first match wins.
    pub fn authorize(&self, method: &Method, path: &str, authorization: Option<&str>) -> Decision {
        if method == Method::OPTIONS {
            return Decision::BypassedOptions;
        }

        if self.is_allowlisted(path) {
            return Decision::BypassedAllowlist;
        }

        if !path.starts_with(self.config.api_prefix.as_str()) {
            return Decision::OutsideNamespace;
        }

        let Some(token) = extract_bearer_token(authorization) else {
            debug!(%method, path, "denied: no bearer token");
            return Decision::Denied(DenyReason::Unauthenticated);
        };

        let Some(user_id) = self.sessions.resolve(token) else {
            debug!(%method, path, "denied: unresolvable token");
            return Decision::Denied(DenyReason::Unauthenticated);
        };

        let principal = match self.directory.find_principal(user_id) {
            Ok(Some(principal)) => principal,
            Ok(None) => {
                // Session outlived the account; the token no longer
                // identifies anyone.
                warn!(%user_id, "denied: session for unknown user");
                return Decision::Denied(DenyReason::Unauthenticated);
            }
            Err(e) => {
                error!(%user_id, error = %e, "denied: principal lookup failed");
                return Decision::Denied(DenyReason::Internal);
            }
        };

        if !principal.active {
            debug!(%user_id, "denied: account disabled");
            return Decision::Denied(DenyReason::Unauthenticated);
        }

        let Some(role) = principal.role else {
            debug!(%user_id, "denied: no role");
            return Decision::Denied(DenyReason::NoRole);
        };

        if role.name.eq_ignore_ascii_case(&self.config.admin_role) {
            return Decision::Allowed;
        }

        let Some(module) = self.resolver.resolve(path, &self.registry) else {
            debug!(%method, path, role = %role.name, "denied: no governing module");
            return Decision::Denied(DenyReason::NoModule);
        };

        if self.matrix.evaluate(role.id, module.id, method) {
            Decision::Allowed
        } else {
            debug!(
                %method,
                path,
                role = %role.name,
                module = %module.internal_name,
                "denied: capability not granted"
            );
            Decision::Denied(DenyReason::NoPermission)
        }
    }

    fn is_allowlisted(&self, path: &str) -> bool {
        self.config
            .allowlist
            .iter()
            .any(|public| path == public || path.starts_with(&format!("{public}/")))
    }
}
