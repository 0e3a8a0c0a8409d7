//! Bearer token → allow/deny.
//!
//! Checks run in a fixed order and the first failing one decides the
//! response:
//!
//! 1. no token                       → `authorization_required`
//! 2. bad signature / wrong type     → `invalid_token`
//! 3. expired                        → `token_expired`
//! 4. revoked                        → `token_revoked`
//! 5. fresh token required, not fresh → `fresh_token_required`
//!
//! Every rejection is a 401 with a small JSON body. Nothing here writes to
//! the blocklist.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use super::blocklist::RevocationChecker;
use super::claims::AdditionalClaims;
use super::token::{TokenKind, TokenRecord};

/// What kind of token an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequirement {
    Access,
    FreshAccess,
    Refresh,
}

impl TokenRequirement {
    fn accepts(self, kind: TokenKind) -> bool {
        match self {
            TokenRequirement::Access | TokenRequirement::FreshAccess => kind == TokenKind::Access,
            TokenRequirement::Refresh => kind == TokenKind::Refresh,
        }
    }
}

/// Request context handed to handlers once a token is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub jti: String,
    pub expires_at: i64,
    pub kind: TokenKind,
    pub fresh: bool,
    pub claims: AdditionalClaims,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.claims.is_admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Request does not contain an access token.")]
    MissingToken,

    #[error("Signature verification failed.")]
    InvalidSignature,

    #[error("The token has expired.")]
    Expired,

    #[error("The token has been revoked.")]
    Revoked,

    #[error("Token is not fresh.")]
    NotFresh,
}

impl AuthRejection {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "authorization_required",
            AuthRejection::InvalidSignature => "invalid_token",
            AuthRejection::Expired => "token_expired",
            AuthRejection::Revoked => "token_revoked",
            AuthRejection::NotFresh => "fresh_token_required",
        }
    }

    /// Response body. Clients key off these exact field names.
    pub fn to_json(&self) -> Value {
        let text = self.to_string();
        match self {
            AuthRejection::InvalidSignature | AuthRejection::Expired => json!({
                "message": text,
                "error": self.error_code(),
            }),
            AuthRejection::MissingToken | AuthRejection::Revoked | AuthRejection::NotFresh => json!({
                "description": text,
                "error": self.error_code(),
            }),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

/// Decides whether a request carrying `token` may proceed.
pub fn evaluate<R>(
    token: Option<&TokenRecord>,
    requirement: TokenRequirement,
    now: i64,
    revocations: &R,
) -> Result<AuthUser, AuthRejection>
where
    R: RevocationChecker + ?Sized,
{
    let record = token.ok_or(AuthRejection::MissingToken)?;

    let claims = match record {
        TokenRecord::Verified(claims) if requirement.accepts(claims.kind) => claims,
        _ => return Err(AuthRejection::InvalidSignature),
    };
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AuthRejection::InvalidSignature)?;

    if claims.exp <= now {
        return Err(AuthRejection::Expired);
    }

    if revocations.is_revoked(&claims.jti) {
        return Err(AuthRejection::Revoked);
    }

    if requirement == TokenRequirement::FreshAccess && !claims.fresh {
        return Err(AuthRejection::NotFresh);
    }

    Ok(AuthUser {
        user_id,
        jti: claims.jti.clone(),
        expires_at: claims.exp,
        kind: claims.kind,
        fresh: claims.fresh,
        claims: claims.extra,
    })
}
