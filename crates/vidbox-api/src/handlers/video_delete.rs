use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use vidbox_core::AppError;

use crate::auth::CurrentUser;
use crate::error::HttpAppError;
use crate::handlers::video_get::fetch_owned;
use crate::state::AppState;

pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let video = fetch_owned(&state, &user, id).await?;

    // Artifact first. A missing or undeletable file is non-fatal: the
    // record still goes away.
    if let Err(err) = state.store.delete(&video.stored_name).await {
        tracing::warn!(
            error = %err,
            video_id = %video.id,
            "Failed to delete artifact; removing record anyway"
        );
    }

    let removed = state.videos.delete(video.id).await?;
    if !removed {
        // lost a race with another delete of the same id
        return Err(HttpAppError(AppError::NotFound(
            "Video not found".to_string(),
        )));
    }

    tracing::info!(video_id = %video.id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}
