use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

impl Store {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<Store>, DatabaseError> {
        let stores = sqlx::query_as::<_, Store>("SELECT id, name FROM stores ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(stores)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Store>, DatabaseError> {
        let store = sqlx::query_as::<_, Store>("SELECT id, name FROM stores WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(store)
    }

    pub async fn find_404(pool: &SqlitePool, id: i64) -> Result<Store, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Store not found.".to_string()))
    }

    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Store, DatabaseError> {
        let result = sqlx::query("INSERT INTO stores (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, "A store with that name already exists."))?;

        Ok(Store {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Removes the store together with its items and tags.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Store not found.".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::test_support::migrated_db;
    use crate::database::models::{Item, NewItem, Tag};

    #[tokio::test]
    async fn create_find_and_list() {
        let db = migrated_db().await;
        let created = Store::create(db.pool(), "Corner Shop").await.unwrap();
        assert_eq!(Store::find_404(db.pool(), created.id).await.unwrap(), created);
        assert_eq!(Store::all(db.pool()).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let db = migrated_db().await;
        Store::create(db.pool(), "Corner Shop").await.unwrap();
        let err = Store::create(db.pool(), "Corner Shop").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn delete_cascades_to_items_and_tags() {
        let db = migrated_db().await;
        let store = Store::create(db.pool(), "Corner Shop").await.unwrap();
        let item = Item::create(
            db.pool(),
            &NewItem {
                name: "Chair".to_string(),
                price: 10.5,
                store_id: store.id,
                description: None,
            },
        )
        .await
        .unwrap();
        let tag = Tag::create(db.pool(), store.id, "furniture").await.unwrap();

        Store::delete(db.pool(), store.id).await.unwrap();
        assert!(Item::find(db.pool(), item.id).await.unwrap().is_none());
        assert!(Tag::find(db.pool(), tag.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = migrated_db().await;
        let err = Store::delete(db.pool(), 99).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
