use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use crate::auth::{Blocklist, ClaimsAugmenter, JwtKeys};
use crate::config::AppConfig;
use crate::database::models::RevokedToken;
use crate::database::{Database, DatabaseError};

/// How long a revocation outlives its token. A request that read the clock
/// just before expiry must still find the entry when it is evaluated.
pub const SWEEP_GRACE_SECS: i64 = 60;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub keys: JwtKeys,
    pub blocklist: Arc<Blocklist>,
    pub claims: ClaimsAugmenter,
}

impl AppState {
    /// Connects to the database, applies migrations and restores persisted
    /// revocations.
    pub async fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::from_config(&config.security)
            .context("JWT_SECRET_KEY must be set")?;

        let db = Database::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        db.migrate().await.context("failed to apply migrations")?;

        let blocklist = if config.security.persist_blocklist {
            Blocklist::restore(&db, Utc::now().timestamp())
                .await
                .context("failed to restore revoked tokens")?
        } else {
            Blocklist::new()
        };

        Ok(Self {
            claims: ClaimsAugmenter::new(config.security.admin_user_id),
            config: Arc::new(config),
            db,
            keys,
            blocklist: Arc::new(blocklist),
        })
    }

    /// Revokes a token, in memory and (when enabled) in the database.
    pub async fn revoke(&self, jti: &str, expires_at: i64) -> Result<(), DatabaseError> {
        self.blocklist.add_until(jti, expires_at);
        if self.config.security.persist_blocklist {
            RevokedToken::insert(self.db.pool(), jti, expires_at, Utc::now().timestamp()).await?;
        }
        tracing::info!("Revoked token {}", jti);
        Ok(())
    }

    /// Drops revocations for tokens that expired more than
    /// [`SWEEP_GRACE_SECS`] before `now`.
    pub async fn sweep_blocklist(&self, now: i64) -> Result<(), DatabaseError> {
        let cutoff = now - SWEEP_GRACE_SECS;
        let purged = self.blocklist.purge_expired(cutoff);
        let persisted = if self.config.security.persist_blocklist {
            RevokedToken::purge_expired(self.db.pool(), cutoff).await?
        } else {
            0
        };
        if purged > 0 || persisted > 0 {
            tracing::debug!("Blocklist sweep removed {} in-memory and {} stored entries", purged, persisted);
        }
        Ok(())
    }
}
