use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::api::Message;
use crate::auth::TokenKind;
use crate::error::ApiResult;
use crate::middleware::{AccessToken, RefreshToken};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// POST /refresh - Trade a refresh token for a new, non-fresh access token
///
/// The refresh token is single use: its jti is revoked once exchanged.
pub async fn refresh(
    RefreshToken(user): RefreshToken,
    State(state): State<AppState>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let claims = state.claims.compute(user.user_id);
    let access_token = state.keys.issue(
        user.user_id,
        TokenKind::Access,
        false,
        claims,
        Utc::now().timestamp(),
    )?;

    state.revoke(&user.jti, user.expires_at).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// POST /logout - Revoke the presented access token
pub async fn logout(
    AccessToken(user): AccessToken,
    State(state): State<AppState>,
) -> ApiResult<Json<Message>> {
    state.revoke(&user.jti, user.expires_at).await?;
    tracing::info!("User {} logged out", user.user_id);
    Ok(Json(Message::new("Successfully logged out")))
}
