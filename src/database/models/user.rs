use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_404(pool: &SqlitePool, id: i64) -> Result<User, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found.".to_string()))
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Inserts a user; `password_hash` must already be hashed.
    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, "A user with that username already exists."))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password: password_hash.to_string(),
        })
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found.".to_string()));
        }
        Ok(())
    }
}
