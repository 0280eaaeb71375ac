//! Account deletion: removes the user's artifacts, then the user row; the
//! database cascade takes the video and session rows with it.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;

use vidbox_core::AppError;

use crate::auth::session::removal_cookie;
use crate::auth::CurrentUser;
use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), HttpAppError> {
    let videos = state.videos.list_all_for_owner(user.user_id).await?;

    for video in &videos {
        if let Err(err) = state.store.delete(&video.stored_name).await {
            tracing::warn!(
                error = %err,
                video_id = %video.id,
                "Failed to delete artifact during account deletion"
            );
        }
    }

    let removed = state.users.delete(user.user_id).await?;
    if !removed {
        return Err(HttpAppError(AppError::NotFound(
            "User not found".to_string(),
        )));
    }

    tracing::info!(
        user_id = %user.user_id,
        videos_removed = videos.len(),
        "Account deleted"
    );

    Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT))
}
