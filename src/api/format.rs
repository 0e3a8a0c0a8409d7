//! Public wire format for stores, items and tags.
//!
//! Nested relations are rendered "plain" (no further nesting), so an item
//! shows its store and tags but not the store's other items.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::models::{Item, Store, Tag};
use crate::database::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainStore {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainTag {
    pub id: i64,
    pub name: String,
}

impl From<Store> for PlainStore {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
        }
    }
}

impl From<Item> for PlainItem {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            description: item.description,
        }
    }
}

impl From<Tag> for PlainTag {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreView {
    #[serde(flatten)]
    pub store: PlainStore,
    pub items: Vec<PlainItem>,
    pub tags: Vec<PlainTag>,
}

impl StoreView {
    pub async fn load(pool: &SqlitePool, store: Store) -> Result<Self, DatabaseError> {
        let items = Item::for_store(pool, store.id).await?;
        let tags = Tag::for_store(pool, store.id).await?;
        Ok(Self {
            store: store.into(),
            items: items.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: PlainItem,
    pub store: PlainStore,
    pub tags: Vec<PlainTag>,
}

impl ItemView {
    pub async fn load(pool: &SqlitePool, item: Item) -> Result<Self, DatabaseError> {
        let store = Store::find_404(pool, item.store_id).await?;
        let tags = Tag::for_item(pool, item.id).await?;
        Ok(Self {
            item: item.into(),
            store: store.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    #[serde(flatten)]
    pub tag: PlainTag,
    pub store: PlainStore,
    pub items: Vec<PlainItem>,
}

impl TagView {
    pub async fn load(pool: &SqlitePool, tag: Tag) -> Result<Self, DatabaseError> {
        let store = Store::find_404(pool, tag.store_id).await?;
        let items = Item::for_tag(pool, tag.id).await?;
        Ok(Self {
            tag: tag.into(),
            store: store.into(),
            items: items.into_iter().map(Into::into).collect(),
        })
    }
}

/// Response for linking/unlinking an item and a tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagAndItem {
    pub message: String,
    pub item: ItemView,
    pub tag: TagView,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
