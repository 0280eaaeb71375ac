//! Editing video metadata (title and description only; everything else on
//! the record is write-once).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use vidbox_core::models::VideoResponse;
use vidbox_core::AppError;

use crate::auth::CurrentUser;
use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::video_get::fetch_owned;
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn edit_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateVideoRequest>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = fetch_owned(&state, &user, id).await?;

    if req.title.is_none() && req.description.is_none() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Nothing to update".to_string(),
        )));
    }

    let title = match req.title {
        Some(raw) => normalize_title(&raw).map_err(HttpAppError)?,
        None => video.title.clone(),
    };

    let description = match req.description {
        // an empty/whitespace-only description clears the field
        Some(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        None => video.description.clone(),
    };

    let updated = state
        .videos
        .update_details(video.id, &title, description.as_deref())
        .await?;

    tracing::info!(video_id = %video.id, "Video metadata updated");

    Ok(Json(updated.into()))
}

/// Trim a requested title; empty or whitespace-only titles are rejected so
/// the prior value is retained.
pub(crate) fn normalize_title(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Title must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Title too long (max {} characters)",
            MAX_TITLE_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_trims() {
        assert_eq!(normalize_title("  My Clip  ").unwrap(), "My Clip");
        assert_eq!(normalize_title("plain").unwrap(), "plain");
    }

    #[test]
    fn test_normalize_title_rejects_empty() {
        assert!(normalize_title("").is_err());
        assert!(normalize_title("   ").is_err());
        assert!(normalize_title("\t\n").is_err());
    }

    #[test]
    fn test_normalize_title_rejects_oversized() {
        let long = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(normalize_title(&long).is_err());
        let max = "x".repeat(MAX_TITLE_CHARS);
        assert_eq!(normalize_title(&max).unwrap(), max);
    }
}
