//! Serving stored artifacts: inline playback and attachment download.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use uuid::Uuid;

use vidbox_core::models::Video;
use vidbox_core::AppError;

use crate::auth::CurrentUser;
use crate::error::HttpAppError;
use crate::handlers::video_get::fetch_owned;
use crate::state::AppState;
use crate::utils::upload::header_safe_filename;

// Every committed artifact is canonical MP4.
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

enum Disposition {
    Inline,
    Attachment,
}

pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let video = fetch_owned(&state, &user, id).await?;
    serve_artifact(&state, &video, Disposition::Inline).await
}

pub async fn download_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let video = fetch_owned(&state, &user, id).await?;
    serve_artifact(&state, &video, Disposition::Attachment).await
}

async fn serve_artifact(
    state: &AppState,
    video: &Video,
    disposition: Disposition,
) -> Result<Response, HttpAppError> {
    let size = state.store.file_size(&video.stored_name).await?;
    let stream = state.store.open_stream(&video.stored_name).await?;

    // Downloads carry the uploader's filename, not the stored one.
    let disposition_value = match disposition {
        Disposition::Inline => "inline".to_string(),
        Disposition::Attachment => format!(
            "attachment; filename=\"{}\"",
            header_safe_filename(&video.original_name)
        ),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition_value)
        .body(Body::from_stream(stream))
        .map_err(|e| {
            HttpAppError(AppError::Internal(format!(
                "Failed to build response: {}",
                e
            )))
        })
}
