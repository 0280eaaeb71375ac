//! Upload pipeline
//!
//! One ingestion path for every video: extract → validate → store raw →
//! normalize to MP4 → commit metadata. At most two files are written (raw
//! plus transcoded, with the raw one deleted on success) and exactly one
//! record is inserted; on any failure neither an orphan file nor a
//! dangling record survives.

use axum::extract::Multipart;
use uuid::Uuid;

use vidbox_core::models::Video;
use vidbox_core::AppError;
use vidbox_processing::{
    needs_transcode, TranscodeError, Transcoder, ValidationError, CANONICAL_EXTENSION,
};
use vidbox_storage::{StorageError, VideoStore};

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file was provided")]
    NoFile,

    #[error("No file was selected")]
    EmptySelection,

    #[error("Malformed upload request: {0}")]
    Malformed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error("Failed to record video metadata")]
    Database(#[source] AppError),
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => {
                HttpAppError(AppError::InvalidInput("No file was provided".to_string()))
            }
            UploadError::EmptySelection => {
                HttpAppError(AppError::InvalidInput("No file was selected".to_string()))
            }
            UploadError::Malformed(msg) => HttpAppError(AppError::InvalidInput(msg)),
            UploadError::Validation(e) => e.into(),
            UploadError::Storage(e) => e.into(),
            UploadError::Transcode(e) => HttpAppError(AppError::Transcode(e.to_string())),
            UploadError::Database(e) => HttpAppError(e),
        }
    }
}

/// Orchestrates one upload from multipart form to committed metadata.
pub struct UploadService<'a> {
    state: &'a AppState,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn ingest(
        &self,
        owner_id: Uuid,
        multipart: Multipart,
    ) -> Result<Video, UploadError> {
        let (data, original_name) = extract_file(multipart).await?;

        self.state.validator.validate_file_size(data.len())?;
        let extension = self.state.validator.validate_extension(&original_name)?;

        // The record id is allocated up front so the stored name can derive
        // from it: collision-resistant and free of user input.
        let video_id = Uuid::new_v4();

        tracing::info!(
            video_id = %video_id,
            original_name = %original_name,
            size_bytes = data.len(),
            "Ingesting upload"
        );

        let stored_name = persist_artifact(
            &self.state.store,
            &self.state.transcoder,
            video_id,
            &extension,
            &data,
        )
        .await?;
        drop(data);

        let title = default_title(&original_name);

        match self
            .state
            .videos
            .create(video_id, owner_id, &stored_name, &original_name, &title, None)
            .await
        {
            Ok(video) => {
                tracing::info!(video_id = %video_id, stored_name = %stored_name, "Upload committed");
                Ok(video)
            }
            Err(e) => {
                // The record did not commit; the artifact must not survive.
                discard(&self.state.store, &stored_name).await;
                Err(UploadError::Database(e))
            }
        }
    }
}

/// Write the raw upload under the upload root and, when the container is
/// not already canonical, transcode it. Returns the final stored name.
pub(crate) async fn persist_artifact(
    store: &VideoStore,
    transcoder: &Transcoder,
    video_id: Uuid,
    extension: &str,
    data: &[u8],
) -> Result<String, UploadError> {
    let raw_name = format!("{}.{}", video_id, extension);
    store.save(&raw_name, data).await?;

    if needs_transcode(extension) {
        normalize_artifact(store, transcoder, video_id, &raw_name).await
    } else {
        Ok(raw_name)
    }
}

/// Transcode a non-canonical upload to MP4 and discard the raw file.
///
/// Any failure aborts the ingestion: the raw upload and any partial output
/// are deleted so nothing is left for a record to dangle on.
async fn normalize_artifact(
    store: &VideoStore,
    transcoder: &Transcoder,
    video_id: Uuid,
    raw_name: &str,
) -> Result<String, UploadError> {
    let target_name = format!("{}.{}", video_id, CANONICAL_EXTENSION);
    let input = store.resolve(raw_name)?;
    let output = store.resolve(&target_name)?;

    if let Err(err) = transcoder.to_mp4(&input, &output).await {
        discard(store, raw_name).await;
        discard(store, &target_name).await;
        return Err(err.into());
    }

    // At most one artifact per video: the raw upload goes away the moment
    // the canonical file exists. If it refuses to go away, abort rather
    // than commit while two artifacts exist.
    if let Err(err) = store.delete(raw_name).await {
        discard(store, &target_name).await;
        return Err(err.into());
    }

    Ok(target_name)
}

async fn discard(store: &VideoStore, stored_name: &str) {
    if let Err(err) = store.delete(stored_name).await {
        tracing::warn!(
            error = %err,
            stored_name = %stored_name,
            "Failed to discard artifact during upload abort"
        );
    }
}

/// Pull the single `file` field out of the multipart form.
async fn extract_file(mut multipart: Multipart) -> Result<(Vec<u8>, String), UploadError> {
    let mut payload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(format!("Failed to read multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            if payload.is_some() {
                return Err(UploadError::Malformed(
                    "Send exactly one field named 'file'".to_string(),
                ));
            }
            let filename = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Malformed(format!("Failed to read file data: {}", e)))?;
            payload = Some((data.to_vec(), filename));
        }
    }

    let (data, filename) = payload.ok_or(UploadError::NoFile)?;

    let original_name = filename
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::EmptySelection)?;

    Ok((data, original_name))
}

/// Default title: the original filename with its extension removed.
pub fn default_title(original_name: &str) -> String {
    let stem = match original_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original_name,
    };
    let trimmed = stem.trim();
    if trimmed.is_empty() {
        "Untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;
    use vidbox_core::ErrorMetadata;

    #[test]
    fn test_default_title_strips_extension() {
        assert_eq!(default_title("clip.MOV"), "clip");
        assert_eq!(default_title("holiday.tar.mkv"), "holiday.tar");
        assert_eq!(default_title("clip"), "clip");
        assert_eq!(default_title(" spaced name .mp4"), "spaced name");
        assert_eq!(default_title(".mov"), ".mov");
        assert_eq!(default_title("   "), "Untitled");
    }

    #[test]
    fn test_no_file_maps_to_bad_request() {
        let HttpAppError(app_err) = UploadError::NoFile.into();
        assert_eq!(app_err.http_status_code(), 400);

        let HttpAppError(app_err) = UploadError::EmptySelection.into();
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_unsupported_type_maps_to_bad_request() {
        let err = UploadError::Validation(ValidationError::InvalidExtension {
            extension: "webm".to_string(),
            allowed: vec!["mp4".to_string()],
        });
        let HttpAppError(app_err) = err.into();
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_transcode_failure_is_opaque_server_error() {
        let err = UploadError::Transcode(TranscodeError::Failed {
            status: Some(1),
            stderr: "moov atom not found".to_string(),
        });
        let HttpAppError(app_err) = err.into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.client_message(), "Failed to convert video");
        assert!(app_err.is_sensitive());
    }

    /// A transcoder stand-in: a shell script that copies input to output,
    /// matching the invocation shape `-y -i <input> <output>`.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-ffmpeg");
        std::fs::write(&path, "#!/bin/sh\ncp \"$3\" \"$4\"\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_canonical_upload_skips_transcoder() {
        let dir = tempdir().unwrap();
        let store = VideoStore::new(dir.path().join("uploads")).await.unwrap();
        // A transcoder that would fail if invoked proves it never runs.
        let transcoder = Transcoder::new("false", Duration::from_secs(5));

        let video_id = Uuid::new_v4();
        let stored = persist_artifact(&store, &transcoder, video_id, "mp4", b"mp4 bytes")
            .await
            .unwrap();

        assert_eq!(stored, format!("{}.mp4", video_id));
        assert!(store.exists(&stored).await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_canonical_upload_is_normalized_and_raw_discarded() {
        let dir = tempdir().unwrap();
        let store = VideoStore::new(dir.path().join("uploads")).await.unwrap();
        let transcoder = Transcoder::new(fake_ffmpeg(dir.path()), Duration::from_secs(5));

        let video_id = Uuid::new_v4();
        let stored = persist_artifact(&store, &transcoder, video_id, "mov", b"mov bytes")
            .await
            .unwrap();

        // stored name is canonical and the raw upload is gone
        assert_eq!(stored, format!("{}.mp4", video_id));
        assert!(store.exists(&stored).await.unwrap());
        assert!(!store.exists(&format!("{}.mov", video_id)).await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_transcode_aborts_and_cleans_up() {
        let dir = tempdir().unwrap();
        let store = VideoStore::new(dir.path().join("uploads")).await.unwrap();
        let transcoder = Transcoder::new("false", Duration::from_secs(5));

        let video_id = Uuid::new_v4();
        let result = persist_artifact(&store, &transcoder, video_id, "mkv", b"mkv bytes").await;

        assert!(matches!(result, Err(UploadError::Transcode(_))));
        // neither the raw upload nor a partial output survives
        assert!(!store.exists(&format!("{}.mkv", video_id)).await.unwrap());
        assert!(!store.exists(&format!("{}.mp4", video_id)).await.unwrap());
    }
}
