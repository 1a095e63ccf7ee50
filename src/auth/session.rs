//! Opaque-token session store
//!
//! Sessions are plain bearer handles: a random token bound to a user id.
//! There are no embedded claims and no expiry; a session lives from login
//! until an explicit logout or process shutdown.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use uuid::Uuid;

/// Number of random bytes per token; hex-encoded to 64 characters.
const TOKEN_BYTES: usize = 32;

/// A single live session
#[derive(Debug, Clone)]
pub struct Session {
    /// Owning user
    pub user_id: Uuid,
    /// When the session was issued; recorded for log lines only, never
    /// consulted for validity (the store has no TTL)
    pub issued_at: DateTime<Utc>,
}

/// Concurrent token -> session map
///
/// The store is the sole owner of the token map. All methods are safe to
/// call from many request-handling tasks without external locking.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token bound to `user_id`
    ///
    /// Collisions between random 256-bit tokens are treated as negligible;
    /// no dedup check is performed.
    pub fn issue(&self, user_id: Uuid) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                issued_at: Utc::now(),
            },
        );
        tracing::debug!(%user_id, "session issued");
        token
    }

    /// Resolve a token to its user id
    ///
    /// Unknown, empty, or malformed tokens are all simply not found; this
    /// never fails for bad input.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        if token.is_empty() {
            return None;
        }
        self.sessions.get(token).map(|entry| entry.user_id)
    }

    /// Remove a session; idempotent
    pub fn revoke(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            tracing::debug!("session revoked");
        }
    }

    /// Whether a token currently maps to a session
    pub fn is_valid(&self, token: &str) -> bool {
        !token.is_empty() && self.sessions.contains_key(token)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
