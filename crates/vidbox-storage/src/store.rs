use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

const MAX_STORED_NAME_LENGTH: usize = 255;

/// Video artifact store rooted at the configured upload directory.
///
/// Stored names are single path components (`{uuid}.{ext}`); anything that
/// could resolve outside the root is rejected before it reaches the
/// filesystem.
#[derive(Clone)]
pub struct VideoStore {
    root: PathBuf,
}

impl VideoStore {
    /// Create the store, creating the root directory if absent.
    ///
    /// An uncreatable root is a hard error: the service cannot serve any
    /// upload or stream without it.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload root {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(VideoStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored name to an absolute path inside the upload root.
    ///
    /// Rejects empty names, path separators, and `..` so a corrupted or
    /// crafted stored name can never escape the root.
    pub fn resolve(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.is_empty() || stored_name.len() > MAX_STORED_NAME_LENGTH {
            return Err(StorageError::InvalidName(
                "Stored name must be a non-empty single path component".to_string(),
            ));
        }

        if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
            return Err(StorageError::InvalidName(
                "Stored name resolves outside the upload root".to_string(),
            ));
        }

        Ok(self.root.join(stored_name))
    }

    /// Persist raw bytes under the given stored name.
    ///
    /// Opens with `create_new`: an existing file with the same name is an
    /// error, never an overwrite.
    pub async fn save(&self, stored_name: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.resolve(stored_name)?;
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored video artifact"
        );

        Ok(path)
    }

    /// Read the full artifact into memory.
    pub async fn read(&self, stored_name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(stored_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(stored_name.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Open the artifact as a chunked byte stream (for HTTP bodies).
    pub async fn open_stream(
        &self,
        stored_name: &str,
    ) -> StorageResult<ReaderStream<fs::File>> {
        let path = self.resolve(stored_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(stored_name.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        Ok(ReaderStream::new(file))
    }

    pub async fn exists(&self, stored_name: &str) -> StorageResult<bool> {
        let path = self.resolve(stored_name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    pub async fn file_size(&self, stored_name: &str) -> StorageResult<u64> {
        let path = self.resolve(stored_name)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|_| StorageError::NotFound(stored_name.to_string()))?;
        Ok(meta.len())
    }

    /// Delete the artifact. A missing file is not an error.
    pub async fn delete(&self, stored_name: &str) -> StorageResult<()> {
        let path = self.resolve(stored_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), "Deleted video artifact");

        Ok(())
    }
}
