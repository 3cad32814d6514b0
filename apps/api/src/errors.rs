use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::{LlmError, MalformedResponse, ProviderError};
use crate::schema::SchemaViolation;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The message is shown to the end user verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),

    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    #[error("File exceeds the {limit_mb} MB upload limit")]
    UploadTooLarge { limit_mb: usize },

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Provider(e) => AppError::Provider(e),
            LlmError::Malformed(e) => AppError::MalformedResponse(e),
            LlmError::Schema(e) => AppError::SchemaViolation(e),
        }
    }
}

/// JSON body extractor whose rejections use the `{error, code}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl AppError {
    /// Multipart read failures: size limits become 413, the rest 400.
    pub fn upload(err: MultipartError, limit_bytes: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::UploadTooLarge {
                limit_mb: limit_bytes / (1024 * 1024),
            };
        }
        AppError::Validation(format!("Invalid upload: {}", err.body_text()))
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Provider(ProviderError::Unreachable { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
            }
            AppError::Provider(ProviderError::Timeout { .. }) => {
                (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT")
            }
            AppError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR"),
            AppError::MalformedResponse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_RESPONSE")
            }
            AppError::SchemaViolation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SCHEMA_VIOLATION"),
            AppError::UploadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::Pdf(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PDF_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        match &self {
            AppError::Validation(_) | AppError::UploadTooLarge { .. } => {
                tracing::debug!("Rejected request: {message}")
            }
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::error!("{code}: {message}"),
        }

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
