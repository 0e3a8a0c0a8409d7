use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::Message;
use crate::database::models::User;
use crate::error::ApiResult;
use crate::middleware::{require_admin, AccessToken};
use crate::state::AppState;

/// GET /user/:id
pub async fn get_user(
    AccessToken(_user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(User::find_404(state.db.pool(), id).await?))
}

/// DELETE /user/:id (admin)
pub async fn delete_user(
    AccessToken(user): AccessToken,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    require_admin(&user)?;
    User::delete(state.db.pool(), id).await?;
    tracing::info!("User {} deleted by {}", id, user.user_id);
    Ok(Json(Message::new("User deleted.")))
}
