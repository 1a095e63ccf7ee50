//! Configuration management for the gateway
//!
//! All authorization behavior that is data rather than logic lives here: the
//! protected API prefix, the public allowlist, and the path alias table.

use crate::utils::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Authorization pipeline settings
    #[serde(default)]
    pub authorization: AuthorizationConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Authorization pipeline settings
///
/// The allowlist and alias table are configuration data, not logic: they are
/// consulted verbatim by the gate and the path resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    /// Prefix of the protected namespace; requests outside it bypass the gate
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Public paths that bypass authorization (exact or prefix match)
    #[serde(default = "default_allowlist")]
    pub allowlist: Vec<String>,
    /// Path aliases applied after normalization, before registry lookup.
    /// Registration endpoints are governed by the account-management resource.
    #[serde(default = "default_path_aliases")]
    pub path_aliases: Vec<PathAlias>,
    /// Role name that bypasses all checks (compared case-insensitively)
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

/// A single path alias rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathAlias {
    /// Normalized path to rewrite
    pub from: String,
    /// Canonical path it is treated as
    pub to: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_allowlist() -> Vec<String> {
    [
        "/api/login",
        "/api/register",
        "/api/register/check",
        "/api/options",
        "/health",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_path_aliases() -> Vec<PathAlias> {
    vec![
        PathAlias {
            from: "/register".to_string(),
            to: "/accounts".to_string(),
        },
        PathAlias {
            from: "/register/check".to_string(),
            to: "/accounts".to_string(),
        },
    ]
}

fn default_admin_role() -> String {
    "ADMIN".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            allowlist: default_allowlist(),
            path_aliases: default_path_aliases(),
            admin_role: default_admin_role(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> Result<()> {
        let authz = &self.authorization;
        if !authz.api_prefix.starts_with('/') || authz.api_prefix.len() < 2 {
            return Err(GateError::Config(format!(
                "api_prefix must be a non-root absolute path, got {:?}",
                authz.api_prefix
            )));
        }
        if authz.admin_role.trim().is_empty() {
            return Err(GateError::Config("admin_role must not be empty".to_string()));
        }
        for alias in &authz.path_aliases {
            if !alias.from.starts_with('/') || !alias.to.starts_with('/') {
                return Err(GateError::Config(format!(
                    "path alias {:?} -> {:?} must use absolute paths",
                    alias.from, alias.to
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.authorization.api_prefix, "/api");
        assert!(config
            .authorization
            .allowlist
            .iter()
            .any(|p| p == "/api/login"));
    }

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let yaml = r#"
server:
  port: 9000
authorization:
  api_prefix: /backoffice
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.authorization.api_prefix, "/backoffice");
        assert_eq!(config.authorization.admin_role, "ADMIN");
    }

    #[test]
    fn rejects_relative_prefix() {
        let mut config = Config::default();
        config.authorization.api_prefix = "api".to_string();
        assert!(config.validate().is_err());
    }
}
