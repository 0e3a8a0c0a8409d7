use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
}

impl Tag {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Tag>, DatabaseError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, store_id FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(tag)
    }

    pub async fn find_404(pool: &SqlitePool, id: i64) -> Result<Tag, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Tag not found.".to_string()))
    }

    pub async fn for_store(pool: &SqlitePool, store_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, store_id FROM tags WHERE store_id = ? ORDER BY id",
        )
        .bind(store_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    pub async fn for_item(pool: &SqlitePool, item_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT tags.id, tags.name, tags.store_id FROM tags \
             JOIN items_tags ON items_tags.tag_id = tags.id \
             WHERE items_tags.item_id = ? ORDER BY tags.id",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    pub async fn create(pool: &SqlitePool, store_id: i64, name: &str) -> Result<Tag, DatabaseError> {
        let result = sqlx::query("INSERT INTO tags (name, store_id) VALUES (?, ?)")
            .bind(name)
            .bind(store_id)
            .execute(pool)
            .await
            .map_err(|e| {
                DatabaseError::on_unique_violation(e, "A tag with that name already exists in that store.")
            })?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            store_id,
        })
    }

    /// Deletes the tag only if no item is linked to it at the time of the
    /// delete.
    ///
    /// `Ok(false)` when links remain; `NotFound` when there is no such tag.
    pub async fn delete_unlinked(pool: &SqlitePool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM tags WHERE id = ? \
             AND NOT EXISTS (SELECT 1 FROM items_tags WHERE tag_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(pool)
        .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }

        match Self::find(pool, id).await? {
            Some(_) => Ok(false),
            None => Err(DatabaseError::NotFound("Tag not found.".to_string())),
        }
    }

    /// Links an item to this tag. Linking twice is a no-op.
    pub async fn link_item(pool: &SqlitePool, tag_id: i64, item_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("INSERT OR IGNORE INTO items_tags (item_id, tag_id) VALUES (?, ?)")
            .bind(item_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn unlink_item(pool: &SqlitePool, tag_id: i64, item_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM items_tags WHERE item_id = ? AND tag_id = ?")
            .bind(item_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::test_support::migrated_db;
    use crate::database::models::{Item, NewItem, Store};

    #[tokio::test]
    async fn names_are_unique_per_store_only() {
        let db = migrated_db().await;
        let a = Store::create(db.pool(), "A").await.unwrap();
        let b = Store::create(db.pool(), "B").await.unwrap();

        Tag::create(db.pool(), a.id, "sale").await.unwrap();
        Tag::create(db.pool(), b.id, "sale").await.unwrap();
        let err = Tag::create(db.pool(), a.id, "sale").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn link_and_unlink_items() {
        let db = migrated_db().await;
        let store = Store::create(db.pool(), "A").await.unwrap();
        let tag = Tag::create(db.pool(), store.id, "sale").await.unwrap();
        let item = Item::create(
            db.pool(),
            &NewItem {
                name: "Lamp".to_string(),
                price: 3.0,
                store_id: store.id,
                description: None,
            },
        )
        .await
        .unwrap();

        Tag::link_item(db.pool(), tag.id, item.id).await.unwrap();
        Tag::link_item(db.pool(), tag.id, item.id).await.unwrap();
        assert_eq!(Tag::for_item(db.pool(), item.id).await.unwrap(), vec![tag.clone()]);
        assert_eq!(Item::for_tag(db.pool(), tag.id).await.unwrap(), vec![item.clone()]);

        Tag::unlink_item(db.pool(), tag.id, item.id).await.unwrap();
        assert!(Item::for_tag(db.pool(), tag.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unlinked_refuses_linked_tags() {
        let db = migrated_db().await;
        let store = Store::create(db.pool(), "A").await.unwrap();
        let tag = Tag::create(db.pool(), store.id, "sale").await.unwrap();
        let item = Item::create(
            db.pool(),
            &NewItem {
                name: "Lamp".to_string(),
                price: 3.0,
                store_id: store.id,
                description: None,
            },
        )
        .await
        .unwrap();
        Tag::link_item(db.pool(), tag.id, item.id).await.unwrap();

        assert!(!Tag::delete_unlinked(db.pool(), tag.id).await.unwrap());
        assert_eq!(Tag::for_item(db.pool(), item.id).await.unwrap(), vec![tag.clone()]);

        Tag::unlink_item(db.pool(), tag.id, item.id).await.unwrap();
        assert!(Tag::delete_unlinked(db.pool(), tag.id).await.unwrap());
        assert!(Tag::find(db.pool(), tag.id).await.unwrap().is_none());

        let err = Tag::delete_unlinked(db.pool(), tag.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
