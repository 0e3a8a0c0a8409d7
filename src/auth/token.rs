use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::claims::AdditionalClaims;
use crate::config::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload for both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub fresh: bool,
    #[serde(flatten)]
    pub extra: AdditionalClaims,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// What a bearer token turned out to be once its signature was checked.
///
/// Expiry, revocation and freshness are not judged here; the decision flow
/// applies them in its own order.
#[derive(Debug, Clone)]
pub enum TokenRecord {
    /// Malformed, or signed with another key.
    Unverified,
    Verified(JwtClaims),
}

impl TokenRecord {
    pub fn signature_valid(&self) -> bool {
        matches!(self, TokenRecord::Verified(_))
    }

    pub fn claims(&self) -> Option<&JwtClaims> {
        match self {
            TokenRecord::Verified(claims) => Some(claims),
            TokenRecord::Unverified => None,
        }
    }
}

/// Signing material and lifetimes for issued tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        if security.jwt_secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        let secret = security.jwt_secret.as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl_secs: security.access_token_ttl_secs,
            refresh_ttl_secs: security.refresh_token_ttl_secs,
        })
    }

    /// Signs a new token for `principal`, valid from `now`.
    pub fn issue(
        &self,
        principal: i64,
        kind: TokenKind,
        fresh: bool,
        extra: AdditionalClaims,
        now: i64,
    ) -> Result<String, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let claims = JwtClaims {
            sub: principal.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            nbf: now,
            exp: now + ttl,
            kind,
            fresh,
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verifies the signature of `token` and decodes its claims.
    pub fn inspect(&self, token: &str) -> TokenRecord {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        match decode::<JwtClaims>(token, &self.decoding, &validation) {
            Ok(data) => TokenRecord::Verified(data.claims),
            Err(e) => {
                tracing::debug!("Bearer token failed verification: {}", e);
                TokenRecord::Unverified
            }
        }
    }
}
