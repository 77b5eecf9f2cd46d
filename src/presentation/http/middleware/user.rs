use axum::http::{HeaderMap, header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::entity::UserRef;
use crate::presentation::http::{errors::AppError, state::AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: usize,
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

pub fn decode_optional_user_claims(headers: &HeaderMap, secret: &str) -> Option<UserClaims> {
    let token = extract_bearer_token(headers)?;
    decode::<UserClaims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|d| d.claims)
}

pub fn decode_required_user_claims(
    headers: &HeaderMap,
    secret: &str,
) -> Result<UserClaims, AppError> {
    decode_optional_user_claims(headers, secret)
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid bearer token".to_string()))
}

/// Resolves the caller for write endpoints. The token must verify and its
/// subject must name a known user.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserRef, AppError> {
    let claims = decode_required_user_claims(headers, &state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {}", user_id)))
}

/// Resolves the caller for read endpoints. Anonymous, invalid or unknown
/// callers all read as anonymous.
pub async fn optional_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<UserRef>, AppError> {
    let Some(claims) = decode_optional_user_claims(headers, &state.config.jwt_secret) else {
        return Ok(None);
    };
    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(None);
    };
    Ok(state.users.find_by_id(user_id).await?)
}
