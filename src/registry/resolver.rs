//! Path resolution: raw request path -> governing module
//!
//! Business endpoints are not individually registered; only their owning
//! resource is. `/contracts/{id}/approve` is governed by whichever of
//! `/contracts/{id}/approve`, `/contracts/{id}`, `/contracts` is registered,
//! longest match first, the way directory permissions apply to files.

use crate::config::PathAlias;
use crate::registry::{Module, ModuleRegistry};
use uuid::Uuid;

/// Resolves request paths against the module registry
#[derive(Debug, Clone)]
pub struct PathResolver {
    prefix: String,
    aliases: Vec<PathAlias>,
}

impl PathResolver {
    /// Create a resolver for the protected namespace `prefix`
    pub fn new(prefix: impl Into<String>, aliases: Vec<PathAlias>) -> Self {
        Self {
            prefix: prefix.into(),
            aliases,
        }
    }

    /// Normalize a raw request path to a candidate canonical path
    ///
    /// Returns None when the path is outside the protected namespace or
    /// degenerates to nothing; an empty path never matches as a catch-all.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let path = raw.strip_prefix(self.prefix.as_str())?;
        let path = path.split('?').next().unwrap_or("");

        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }

        // `/accounts/{id}` collapses to `/accounts`, but an identifier in
        // the middle of the path is left alone, and a bare identifier is
        // never collapsed to the empty path.
        if segments.len() >= 2 && looks_like_identifier(segments[segments.len() - 1]) {
            segments.pop();
        }

        let mut normalized = format!("/{}", segments.join("/"));
        for alias in &self.aliases {
            if normalized == alias.from {
                normalized = alias.to.clone();
                break;
            }
        }
        Some(normalized)
    }

    /// Resolve a raw request path to its governing module
    ///
    /// Exact match first, then parent fallback: drop the last segment and
    /// retry until a single-segment path has been tried. No match is a
    /// deny condition for the caller, never a default allow.
    pub fn resolve(&self, raw: &str, registry: &ModuleRegistry) -> Option<Module> {
        let mut candidate = self.normalize(raw)?;

        loop {
            if let Some(module) = registry.find_by_path(&candidate) {
                return Some(module);
            }
            match candidate.rfind('/') {
                // "/a/b" -> "/a"; stop once the single-segment path missed.
                Some(idx) if idx > 0 => candidate.truncate(idx),
                _ => return None,
            }
        }
    }
}

/// Whether a trailing path segment is an identifier rather than a resource
/// name: a UUID literal, a 32-character hex blob, or a pure decimal integer.
fn looks_like_identifier(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    if Uuid::try_parse(segment).is_ok() {
        return true;
    }
    if segment.len() == 32 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }
    segment.chars().all(|c| c.is_ascii_digit())
}
