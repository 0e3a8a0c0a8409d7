use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::{FieldCheck, Message, StoreView, Validate, ValidJson};
use crate::database::models::Store;
use crate::error::{ApiResult, FieldErrors};
use crate::middleware::{require_admin, AccessToken};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreCreate {
    pub name: Option<String>,
}

impl Validate for StoreCreate {
    fn validate(&self) -> Result<(), FieldErrors> {
        FieldCheck::new().require_text("name", self.name.as_deref()).finish()
    }
}

/// GET /store
pub async fn list_stores(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<StoreView>>> {
    let pool = state.db.pool();
    let mut views = Vec::new();
    for store in Store::all(pool).await? {
        views.push(StoreView::load(pool, store).await?);
    }
    Ok(Json(views))
}

/// POST /store
pub async fn create_store(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<StoreCreate>,
) -> ApiResult<(StatusCode, Json<StoreView>)> {
    let name = body.name.unwrap_or_default();
    let store = Store::create(state.db.pool(), name.trim()).await?;
    let view = StoreView::load(state.db.pool(), store).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /store/:id
pub async fn get_store(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StoreView>> {
    let store = Store::find_404(state.db.pool(), id).await?;
    Ok(Json(StoreView::load(state.db.pool(), store).await?))
}

/// DELETE /store/:id (admin) - also removes the store's items and tags
pub async fn delete_store(
    AccessToken(user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    require_admin(&user)?;
    Store::delete(state.db.pool(), id).await?;
    Ok(Json(Message::new("Store deleted.")))
}
