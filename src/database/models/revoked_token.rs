use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

/// Persisted revocation, kept until the token would have expired.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RevokedToken {
    pub jti: String,
    pub expires_at: i64,
    pub revoked_at: i64,
}

impl RevokedToken {
    pub async fn insert(
        pool: &SqlitePool,
        jti: &str,
        expires_at: i64,
        revoked_at: i64,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO revoked_tokens (jti, expires_at, revoked_at) VALUES (?, ?, ?) \
             ON CONFLICT (jti) DO UPDATE SET expires_at = MAX(expires_at, excluded.expires_at)",
        )
        .bind(jti)
        .bind(expires_at)
        .bind(revoked_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revocations whose token has not yet expired at `now`.
    pub async fn active(pool: &SqlitePool, now: i64) -> Result<Vec<RevokedToken>, DatabaseError> {
        let tokens = sqlx::query_as::<_, RevokedToken>(
            "SELECT jti, expires_at, revoked_at FROM revoked_tokens WHERE expires_at > ?",
        )
        .bind(now)
        .fetch_all(pool)
        .await?;
        Ok(tokens)
    }

    pub async fn purge_expired(pool: &SqlitePool, now: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
