//! Revoked token identifiers.
//!
//! Every authenticated request consults the blocklist once, so reads vastly
//! outnumber writes (logout and refresh). Entries remember when the revoked
//! token would have expired anyway; past that point the entry can be purged
//! without changing any decision, since expiry is checked before revocation.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::database::{models::RevokedToken, Database, DatabaseError};

/// Answers whether a token identifier has been revoked.
pub trait RevocationChecker: Send + Sync {
    fn is_revoked(&self, jti: &str) -> bool;
}

/// In-process set of revoked `jti`s, optionally mirrored to the database.
#[derive(Debug, Default)]
pub struct Blocklist {
    // jti -> expiry of the revoked token (None: never purged)
    entries: RwLock<HashMap<String, Option<i64>>>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, jti: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(jti))
            .unwrap_or_else(|poisoned| poisoned.into_inner().contains_key(jti))
    }

    /// Revokes `jti` for the lifetime of the process.
    pub fn add(&self, jti: &str) {
        self.insert(jti, None);
    }

    /// Revokes `jti`, remembering that the token expires at `expires_at`.
    pub fn add_until(&self, jti: &str, expires_at: i64) {
        self.insert(jti, Some(expires_at));
    }

    fn insert(&self, jti: &str, expires_at: Option<i64>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // An unbounded revocation is never shortened by a later bounded one.
        match entries.get(jti) {
            Some(None) => {}
            Some(Some(existing)) => {
                let merged = expires_at.map(|e| e.max(*existing));
                entries.insert(jti.to_string(), merged);
            }
            None => {
                entries.insert(jti.to_string(), expires_at);
            }
        }
    }

    /// Drops entries whose token has expired by `now`. Returns how many.
    pub fn purge_expired(&self, now: i64) -> usize {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = entries.len();
        entries.retain(|_, expires_at| expires_at.map_or(true, |exp| exp > now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuilds a blocklist from revocations persisted in the database,
    /// skipping those already expired at `now`.
    pub async fn restore(db: &Database, now: i64) -> Result<Self, DatabaseError> {
        let blocklist = Self::new();
        for token in RevokedToken::active(db.pool(), now).await? {
            blocklist.add_until(&token.jti, token.expires_at);
        }
        if !blocklist.is_empty() {
            tracing::info!("Restored {} revoked token(s) from the database", blocklist.len());
        }
        Ok(blocklist)
    }
}

impl RevocationChecker for Blocklist {
    fn is_revoked(&self, jti: &str) -> bool {
        self.contains(jti)
    }
}
