use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{FieldCheck, Message, Validate, ValidJson};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::TokenKind;
use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), FieldErrors> {
        FieldCheck::new()
            .require_text("username", self.username.as_deref())
            .require_text("password", self.password.as_deref())
            .finish()
    }
}

impl Credentials {
    fn into_parts(self) -> (String, String) {
        // validate() guarantees both are present
        (self.username.unwrap_or_default(), self.password.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /register - Create a user account
pub async fn register(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let (username, password) = credentials.into_parts();

    let password_hash = hash_password(&password, state.config.security.password_hash_cost).await?;

    match User::create(state.db.pool(), &username, &password_hash).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({})", user.username, user.id);
            Ok((StatusCode::CREATED, Json(Message::new("User created successfully."))))
        }
        Err(DatabaseError::Conflict(msg)) => Err(ApiError::conflict(msg)),
        Err(e) => Err(e.into()),
    }
}

/// POST /login - Exchange credentials for a fresh access token and a refresh token
pub async fn login(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> ApiResult<Json<TokenPair>> {
    let (username, password) = credentials.into_parts();

    let user = User::find_by_username(state.db.pool(), &username).await?;
    let verified = match &user {
        Some(user) => verify_password(&password, &user.password).await?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::info!("Failed login for username '{}'", username);
            return Err(ApiError::unauthorized("Invalid credentials."));
        }
    };

    let now = Utc::now().timestamp();
    let claims = state.claims.compute(user.id);
    let access_token = state.keys.issue(user.id, TokenKind::Access, true, claims, now)?;
    let refresh_token = state.keys.issue(user.id, TokenKind::Refresh, false, claims, now)?;

    tracing::debug!("Issued token pair for user {}", user.id);
    Ok(Json(TokenPair {
        access_token,
        refresh_token,
    }))
}
