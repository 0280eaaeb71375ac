use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use vidbox_core::models::VideoResponse;

use crate::auth::CurrentUser;
use crate::error::HttpAppError;
use crate::services::UploadService;
use crate::state::AppState;

pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let video = UploadService::new(&state)
        .ingest(user.user_id, multipart)
        .await?;

    Ok((StatusCode::CREATED, Json(video.into())))
}
