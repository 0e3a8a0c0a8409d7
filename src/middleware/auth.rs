use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::Utc;

use crate::auth::{evaluate, AuthRejection, AuthUser, TokenRecord, TokenRequirement};
use crate::error::ApiError;
use crate::state::AppState;

/// Any valid access token.
#[derive(Debug, Clone)]
pub struct AccessToken(pub AuthUser);

/// An access token issued directly by a login.
#[derive(Debug, Clone)]
pub struct FreshToken(pub AuthUser);

/// A refresh token.
#[derive(Debug, Clone)]
pub struct RefreshToken(pub AuthUser);

/// Runs the decision flow for the bearer token in `headers`.
pub fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
    requirement: TokenRequirement,
) -> Result<AuthUser, AuthRejection> {
    let record: Option<TokenRecord> = extract_bearer(headers).map(|token| state.keys.inspect(token));

    evaluate(
        record.as_ref(),
        requirement,
        Utc::now().timestamp(),
        state.blocklist.as_ref(),
    )
    .map_err(|rejection| {
        tracing::debug!("Rejected {:?} request: {}", requirement, rejection.error_code());
        rejection
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

macro_rules! token_extractor {
    ($name:ident, $requirement:expr) => {
        #[async_trait]
        impl FromRequestParts<AppState> for $name {
            type Rejection = AuthRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                authenticate(&parts.headers, state, $requirement).map($name)
            }
        }
    };
}

token_extractor!(AccessToken, TokenRequirement::Access);
token_extractor!(FreshToken, TokenRequirement::FreshAccess);
token_extractor!(RefreshToken, TokenRequirement::Refresh);

/// Admin gate for destructive operations.
pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::debug!("User {} attempted an admin-only operation", user.user_id);
        Err(ApiError::unauthorized("Admin privilege required."))
    }
}
