use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::{FieldCheck, ItemView, Message, Validate, ValidJson};
use crate::database::models::{Item, ItemChanges, NewItem, Store};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::middleware::{require_admin, AccessToken, FreshToken};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ItemCreate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
    pub description: Option<String>,
}

impl Validate for ItemCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        FieldCheck::new()
            .require_text("name", self.name.as_deref())
            .require("price", self.price.as_ref())
            .non_negative("price", self.price)
            .require("store_id", self.store_id.as_ref())
            .finish()
    }
}

/// Body of `PUT /item/:id`. Only `name`, `price` and `description` change an
/// existing item; creating one through PUT also needs `store_id`.
#[derive(Debug, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
    pub description: Option<String>,
}

impl Validate for ItemUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        FieldCheck::new()
            .non_empty_if_present("name", self.name.as_deref())
            .non_negative("price", self.price)
            .finish()
    }
}

async fn create(state: &AppState, id: Option<i64>, new: NewItem) -> ApiResult<ItemView> {
    let pool = state.db.pool();
    // 404 on an unknown store rather than a foreign key failure
    Store::find_404(pool, new.store_id).await?;
    let item = match id {
        Some(id) => Item::create_with_id(pool, id, &new).await?,
        None => Item::create(pool, &new).await?,
    };
    Ok(ItemView::load(pool, item).await?)
}

/// GET /item
pub async fn list_items(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ItemView>>> {
    let pool = state.db.pool();
    let mut views = Vec::new();
    for item in Item::all(pool).await? {
        views.push(ItemView::load(pool, item).await?);
    }
    Ok(Json(views))
}

/// POST /item (fresh token)
pub async fn create_item(
    FreshToken(_user): FreshToken,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ItemCreate>,
) -> ApiResult<(StatusCode, Json<ItemView>)> {
    let (Some(name), Some(price), Some(store_id)) = (body.name, body.price, body.store_id) else {
        return Err(ApiError::invalid_field("_schema", "Missing data for required field."));
    };

    let view = create(
        &state,
        None,
        NewItem {
            name: name.trim().to_string(),
            price,
            store_id,
            description: body.description,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /item/:id
pub async fn get_item(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ItemView>> {
    let item = Item::find_404(state.db.pool(), id).await?;
    Ok(Json(ItemView::load(state.db.pool(), item).await?))
}

/// PUT /item/:id - update, or create under `id` when the item does not exist
pub async fn put_item(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<ItemUpdate>,
) -> ApiResult<Json<ItemView>> {
    let pool = state.db.pool();

    if Item::find(pool, id).await?.is_some() {
        let changes = ItemChanges {
            name: body.name.map(|n| n.trim().to_string()),
            price: body.price,
            description: body.description,
        };
        let item = Item::update(pool, id, &changes).await?;
        return Ok(Json(ItemView::load(pool, item).await?));
    }

    FieldCheck::new()
        .require_text("name", body.name.as_deref())
        .require("price", body.price.as_ref())
        .require("store_id", body.store_id.as_ref())
        .finish()
        .map_err(|errors| ApiError::unprocessable_entity("Unprocessable Entity", errors))?;

    let (Some(name), Some(price), Some(store_id)) = (body.name, body.price, body.store_id) else {
        return Err(ApiError::invalid_field("_schema", "Missing data for required field."));
    };
    let view = create(
        &state,
        Some(id),
        NewItem {
            name: name.trim().to_string(),
            price,
            store_id,
            description: body.description,
        },
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /item/:id (admin)
pub async fn delete_item(
    AccessToken(user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    require_admin(&user)?;
    Item::delete(state.db.pool(), id).await?;
    Ok(Json(Message::new("Item deleted.")))
}
