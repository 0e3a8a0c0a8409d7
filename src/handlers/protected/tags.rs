use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::{FieldCheck, ItemView, Message, TagAndItem, TagView, Validate, ValidJson};
use crate::database::models::{Item, Store, Tag};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::middleware::{require_admin, AccessToken};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TagCreate {
    pub name: Option<String>,
}

impl Validate for TagCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        FieldCheck::new().require_text("name", self.name.as_deref()).finish()
    }
}

/// GET /store/:store_id/tag
pub async fn list_store_tags(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
) -> ApiResult<Json<Vec<TagView>>> {
    let pool = state.db.pool();
    Store::find_404(pool, store_id).await?;

    let mut views = Vec::new();
    for tag in Tag::for_store(pool, store_id).await? {
        views.push(TagView::load(pool, tag).await?);
    }
    Ok(Json(views))
}

/// POST /store/:store_id/tag
pub async fn create_store_tag(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
    ValidJson(body): ValidJson<TagCreate>,
) -> ApiResult<(StatusCode, Json<TagView>)> {
    let pool = state.db.pool();
    Store::find_404(pool, store_id).await?;

    let name = body.name.unwrap_or_default();
    let tag = Tag::create(pool, store_id, name.trim()).await?;
    Ok((StatusCode::CREATED, Json(TagView::load(pool, tag).await?)))
}

/// GET /tag/:id
pub async fn get_tag(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TagView>> {
    let tag = Tag::find_404(state.db.pool(), id).await?;
    Ok(Json(TagView::load(state.db.pool(), tag).await?))
}

/// DELETE /tag/:id (admin) - only tags without items can be removed
pub async fn delete_tag(
    AccessToken(user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    require_admin(&user)?;

    if !Tag::delete_unlinked(state.db.pool(), id).await? {
        return Err(ApiError::bad_request(
            "Could not delete tag. Make sure tag is not associated with any items, then try again.",
        ));
    }

    Ok((StatusCode::ACCEPTED, Json(Message::new("Tag deleted."))))
}

/// POST /item/:item_id/tag/:tag_id
pub async fn link_tag(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<(StatusCode, Json<TagView>)> {
    let pool = state.db.pool();
    let item = Item::find_404(pool, item_id).await?;
    let tag = Tag::find_404(pool, tag_id).await?;

    if item.store_id != tag.store_id {
        return Err(ApiError::bad_request(
            "Make sure item and tag belong to the same store before linking.",
        ));
    }

    Tag::link_item(pool, tag.id, item.id).await?;
    Ok((StatusCode::CREATED, Json(TagView::load(pool, tag).await?)))
}

/// DELETE /item/:item_id/tag/:tag_id
pub async fn unlink_tag(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<Json<TagAndItem>> {
    let pool = state.db.pool();
    let item = Item::find_404(pool, item_id).await?;
    let tag = Tag::find_404(pool, tag_id).await?;

    Tag::unlink_item(pool, tag.id, item.id).await?;

    Ok(Json(TagAndItem {
        message: "Item removed from tag".to_string(),
        item: ItemView::load(pool, item).await?,
        tag: TagView::load(pool, tag).await?,
    }))
}
