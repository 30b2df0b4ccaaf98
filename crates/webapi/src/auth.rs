//! Password digests, JWT session tokens, and the request extractors that
//! enforce them

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{Role, User};
use crate::state::AppState;
use crate::ApiError;

/// Session token lifetime in hours
pub const TOKEN_EXPIRY_HOURS: i64 = 24;

/// Hash a password with SHA-256, hex encoded
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Check a password against a stored digest
pub fn verify_password(password: &str, hashed: &str) -> bool {
    hash_password(password) == hashed
}

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Username, for display without a user lookup
    pub username: String,
    /// Role at issue time; authorization re-checks the stored user
    pub role: Role,
    /// Expiration (unix timestamp)
    pub exp: usize,
    /// Issued at (unix timestamp)
    pub iat: usize,
}

/// Issue a session token for a user
pub fn create_token(user: &User, secret: &str) -> crate::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        exp: (now + chrono::Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to issue token: {}", e)))
}

/// Decode and validate a session token
///
/// Expired or tampered tokens come back as `Unauthorized`.
pub fn decode_token(token: &str, secret: &str) -> crate::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            ApiError::Unauthorized("token expired".to_string())
        }
        _ => ApiError::Unauthorized("invalid token".to_string()),
    })
}

/// The authenticated user behind a request
///
/// Extracts the Bearer token, validates it, and loads the current user
/// record so deleted accounts lose access immediately.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> crate::Result<Self> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        let claims = decode_token(token, &state.jwt_secret)?;

        let user = state
            .db
            .users
            .get(&claims.sub)
            .ok_or_else(|| ApiError::Unauthorized("user no longer exists".to_string()))?;

        Ok(AuthUser(user))
    }
}

/// An authenticated administrator
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> crate::Result<Self> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden(
                "administrator access required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}
