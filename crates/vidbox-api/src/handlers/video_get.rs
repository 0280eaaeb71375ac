//! Listing, search, and single-video metadata.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use vidbox_core::models::{Video, VideoResponse};
use vidbox_core::AppError;

use crate::auth::{ensure_owner, CurrentUser};
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state
        .videos
        .list_for_owner(user.user_id, query.q.as_deref())
        .await?;

    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = fetch_owned(&state, &user, id).await?;
    Ok(Json(video.into()))
}

/// Resolve a video id and apply the ownership guard.
///
/// Missing records fail closed as 404; records owned by someone else get
/// the uniform 403 before any filesystem access or mutation.
pub(crate) async fn fetch_owned(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
) -> Result<Video, HttpAppError> {
    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Video not found".to_string())))?;

    ensure_owner(&video, user.user_id).map_err(HttpAppError)?;

    Ok(video)
}
