use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

const DUPLICATE_ITEM: &str = "An item with that name already exists.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub store_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub store_id: i64,
    pub description: Option<String>,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

const COLUMNS: &str = "items.id, items.name, items.description, items.price, items.store_id";

impl Item {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM items ORDER BY items.id");
        Ok(sqlx::query_as::<_, Item>(&sql).fetch_all(pool).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Item>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM items WHERE items.id = ?");
        Ok(sqlx::query_as::<_, Item>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn find_404(pool: &SqlitePool, id: i64) -> Result<Item, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Item not found.".to_string()))
    }

    pub async fn for_store(pool: &SqlitePool, store_id: i64) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM items WHERE items.store_id = ? ORDER BY items.id");
        Ok(sqlx::query_as::<_, Item>(&sql).bind(store_id).fetch_all(pool).await?)
    }

    pub async fn for_tag(pool: &SqlitePool, tag_id: i64) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM items \
             JOIN items_tags ON items_tags.item_id = items.id \
             WHERE items_tags.tag_id = ? ORDER BY items.id"
        );
        Ok(sqlx::query_as::<_, Item>(&sql).bind(tag_id).fetch_all(pool).await?)
    }

    pub async fn create(pool: &SqlitePool, new: &NewItem) -> Result<Item, DatabaseError> {
        Self::insert(pool, None, new).await
    }

    /// Creates an item under a caller-chosen id.
    pub async fn create_with_id(pool: &SqlitePool, id: i64, new: &NewItem) -> Result<Item, DatabaseError> {
        Self::insert(pool, Some(id), new).await
    }

    // A NULL id lets SQLite assign the next rowid
    async fn insert(pool: &SqlitePool, id: Option<i64>, new: &NewItem) -> Result<Item, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO items (id, name, price, store_id, description) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(new.price)
        .bind(new.store_id)
        .bind(&new.description)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, DUPLICATE_ITEM))?;

        Ok(Item {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            store_id: new.store_id,
        })
    }

    /// Applies `changes` to an existing item and returns the new state.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        changes: &ItemChanges,
    ) -> Result<Item, DatabaseError> {
        let result = sqlx::query(
            "UPDATE items SET \
                name = COALESCE(?, name), \
                price = COALESCE(?, price), \
                description = COALESCE(?, description) \
             WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(changes.price)
        .bind(&changes.description)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, DUPLICATE_ITEM))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Item not found.".to_string()));
        }
        Self::find_404(pool, id).await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Item not found.".to_string()));
        }
        Ok(())
    }
}
