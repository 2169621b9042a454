//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the numeric user id. The
//! [`CurrentUser`] extractor verifies the token and loads the user row once
//! per request; handlers that take it are authenticated, handlers that do not
//! are public.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AppState, User};
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn create_token(secret: &str, user_id: i64, expire_secs: u64) -> AppResult<String> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now.saturating_add(expire_secs),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a token and return the user id it was issued for.
/// Tokens issued for longer than `max_lifetime_secs` are refused.
pub fn verify_token(secret: &str, token: &str, max_lifetime_secs: u64) -> AppResult<i64> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Auth("Token expired".to_string()),
        _ => AppError::Auth("Invalid token".to_string()),
    })?;

    if data.claims.exp.saturating_sub(data.claims.iat) > max_lifetime_secs {
        return Err(AppError::Auth("Token lifetime exceeds maximum".to_string()));
    }

    data.claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Auth("Invalid token subject".to_string()))
}

fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header".to_string()))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Auth("Invalid authorization header".to_string())),
    }
}

/// The authenticated user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let auth = &state.config.auth;
        let user_id = verify_token(&auth.secret, token, auth.max_jwt_expiration)?;

        let user = state
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Auth("Unknown user".to_string()))?;

        debug!(user_id, "Request authenticated");
        Ok(CurrentUser(user))
    }
}
