//! Registration, login, and logout.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use serde::Deserialize;
use validator::Validate;

use vidbox_core::models::UserResponse;
use vidbox_core::AppError;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{generate_token, hash_token, removal_cookie, session_cookie};
use crate::auth::CurrentUser;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

// One message for bad username and bad password: no account enumeration.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80, message = "username must be 3-80 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpAppError> {
    let req = RegisterRequest {
        username: req.username.trim().to_string(),
        password: req.password,
    };
    req.validate().map_err(AppError::from)?;

    let password_hash = hash_password(&req.password)?;
    let user = state.users.create(&req.username, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), HttpAppError> {
    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or_else(|| HttpAppError(AppError::Unauthorized(INVALID_CREDENTIALS.to_string())))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(HttpAppError(AppError::Unauthorized(
            INVALID_CREDENTIALS.to_string(),
        )));
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(state.config.session_ttl_hours);
    state
        .sessions
        .create(user.id, &hash_token(&token), expires_at)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((jar.add(session_cookie(token)), Json(user.into())))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), HttpAppError> {
    state.sessions.delete(user.session_id).await?;

    tracing::info!(user_id = %user.user_id, username = %user.username, "User logged out");

    Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT))
}
