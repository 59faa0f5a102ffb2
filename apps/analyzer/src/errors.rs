use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing credential: environment variable '{0}' is not set")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("Unreadable document {file_name}: {reason}")]
    UnreadableDocument { file_name: String, reason: String },

    #[error("Remote extraction failed for {file_name}: {reason}")]
    RemoteExtraction { file_name: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("No resumes could be processed")]
    NothingToShow,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::CorruptArchive(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnreadableDocument { .. } | AppError::NothingToShow => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RemoteExtraction { .. } => StatusCode::BAD_GATEWAY,
            AppError::MissingCredential(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential(_) => "MISSING_CREDENTIAL",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::CorruptArchive(_) => "CORRUPT_ARCHIVE",
            AppError::UnreadableDocument { .. } => "UNREADABLE_DOCUMENT",
            AppError::RemoteExtraction { .. } => "REMOTE_EXTRACTION_FAILURE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::NothingToShow => "NOTHING_TO_SHOW",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the uploader. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::MissingCredential(_) | AppError::Config(_) => {
                tracing::error!("{self}");
                "The service is not configured correctly".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (self.status(), body).into_response()
    }
}
