//! Registration, login, and the current-user endpoint

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{create_token, hash_password, verify_password, AuthUser};
use crate::models::{LoginRequest, RegisterRequest, Role, TokenResponse, User, UserView};
use crate::state::AppState;
use crate::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

fn validate_registration(req: &RegisterRequest) -> crate::Result<()> {
    let username = req.username.trim();
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::BadRequest(
            "username must be between 3 and 50 characters".to_string(),
        ));
    }
    // Enough to catch typos; real validation happens in the mail client.
    if !req.email.contains('@') || req.email.len() < 3 {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if req.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> crate::Result<Json<TokenResponse>> {
    validate_registration(&req)?;

    if state.db.users.find_one(|u| u.email == req.email).is_some() {
        return Err(ApiError::BadRequest("this email is already in use".to_string()));
    }
    if state
        .db
        .users
        .find_one(|u| u.username == req.username)
        .is_some()
    {
        return Err(ApiError::BadRequest(
            "this username is already taken".to_string(),
        ));
    }

    // The very first account administers the instance.
    let role = if state.db.users.is_empty() {
        Role::Admin
    } else {
        Role::Member
    };

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: req.username.trim().to_string(),
        email: req.email.clone(),
        password_hash: hash_password(&req.password),
        role,
        created_at: Utc::now().to_rfc3339(),
    };
    state.db.users.insert(&user.id, user.clone())?;
    tracing::info!("registered user {} ({:?})", user.username, user.role);

    let access_token = create_token(&user, &state.jwt_secret)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> crate::Result<Json<TokenResponse>> {
    let user = state
        .db
        .users
        .find_one(|u| u.email == req.email)
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("incorrect email or password".to_string()))?;

    let access_token = create_token(&user, &state.jwt_secret)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

async fn me(AuthUser(user): AuthUser) -> Json<UserView> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request("alice", "a@example.com", "secret1")).is_ok());
    }

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_registration(&request("ab", "a@example.com", "secret1")).is_err());
        assert!(validate_registration(&request("abc", "a@example.com", "secret1")).is_ok());
        assert!(validate_registration(&request(&"x".repeat(51), "a@example.com", "secret1")).is_err());
    }

    #[test]
    fn test_email_must_look_like_email() {
        assert!(validate_registration(&request("alice", "nope", "secret1")).is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_registration(&request("alice", "a@example.com", "12345")).is_err());
        assert!(validate_registration(&request("alice", "a@example.com", "123456")).is_ok());
    }
}
