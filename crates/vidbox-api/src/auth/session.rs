//! Session cookie handling and the authenticated-user extractor.
//!
//! The client holds a random token in an HttpOnly cookie; the database
//! stores only its sha256 digest, so a leaked sessions table cannot be
//! replayed.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use vidbox_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "vidbox_session";

const TOKEN_BYTES: usize = 32;

/// Generate a fresh session token (hex).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in the sessions table for a given cookie token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Build the login cookie for a token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}

/// The authenticated requester, resolved from the session cookie.
///
/// The identity is trusted as-is by everything downstream (upload
/// pipeline, ownership guard).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    pub session_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Login required".to_string())))?;

        let session = state
            .sessions
            .find_active(&hash_token(&token))
            .await
            .map_err(HttpAppError)?
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Session expired or invalid".to_string(),
                ))
            })?;

        let user = state
            .users
            .find_by_id(session.user_id)
            .await
            .map_err(HttpAppError)?
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Session expired or invalid".to_string(),
                ))
            })?;

        Ok(CurrentUser {
            user_id: user.id,
            username: user.username,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), hash_token("other"));
        // sha256 hex digest
        assert_eq!(hash_token(&token).len(), 64);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
