//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; anything that
//! implements `Into<AppError>` becomes an `HttpAppError` and renders with a
//! consistent status, body, and log line.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use vidbox_core::{AppError, ErrorMetadata, LogLevel};
use vidbox_processing::ValidationError;
use vidbox_storage::StorageError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in vidbox-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<sqlx::Error> for HttpAppError {
    fn from(err: sqlx::Error) -> Self {
        HttpAppError(AppError::Database(err))
    }
}

/// JSON body deserialization failures render as a 400 with our shape.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidName(msg) => AppError::InvalidInput(msg),
            StorageError::WriteFailed(msg)
            | StorageError::ReadFailed(msg)
            | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::InvalidExtension { extension, allowed } => AppError::InvalidInput(
                format!("Invalid extension '{}', allowed: {:?}", extension, allowed),
            ),
            ValidationError::MissingExtension(filename) => {
                AppError::InvalidInput(format!("Missing file extension (filename: {})", filename))
            }
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

/// JSON body extractor that returns our ErrorResponse shape on
/// deserialization failure instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Hide internals in production and for sensitive errors everywhere.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            details,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("missing.mp4".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
        assert_eq!(app_err.http_status_code(), 404);
    }

    #[test]
    fn test_from_storage_error_invalid_name() {
        let storage_err = StorageError::InvalidName("bad name".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::InvalidInput(_)));
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_from_storage_error_write_failed_is_opaque() {
        let storage_err = StorageError::WriteFailed("disk full at /srv/uploads".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert_eq!(app_err.http_status_code(), 500);
        assert!(app_err.is_sensitive());
    }

    #[test]
    fn test_from_validation_error_file_too_large() {
        let validation_err = ValidationError::FileTooLarge {
            size: 1000,
            max: 500,
        };
        let HttpAppError(app_err) = validation_err.into();
        assert_eq!(app_err.http_status_code(), 413);
    }

    #[test]
    fn test_from_validation_error_invalid_extension() {
        let validation_err = ValidationError::InvalidExtension {
            extension: "exe".to_string(),
            allowed: vec!["mp4".to_string()],
        };
        let HttpAppError(app_err) = validation_err.into();
        match app_err {
            AppError::InvalidInput(msg) => {
                assert!(msg.contains("exe"));
                assert!(msg.contains("mp4"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    /// Public error contract: serialized ErrorResponse always carries
    /// "error" and "code", and "details" only when present.
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Video not found".to_string(),
            code: "NOT_FOUND".to_string(),
            details: None,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            json.get("error").and_then(|v| v.as_str()),
            Some("Video not found")
        );
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("NOT_FOUND"));
        assert!(json.get("details").is_none());
    }
}
