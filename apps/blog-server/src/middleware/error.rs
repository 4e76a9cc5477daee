//! Error handling - RFC 7807 responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use blog_core::{ErrorKind, RepoError};
use blog_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store-side failure; the detail is logged, never returned.
    #[error("Internal error ({kind}): {detail}")]
    Internal { kind: ErrorKind, detail: String },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => {
                ErrorResponse::not_found(detail).with_kind(ErrorKind::NotFound.to_string())
            }
            AppError::BadRequest(detail) => {
                ErrorResponse::bad_request(detail).with_kind(ErrorKind::InvalidInput.to_string())
            }
            AppError::Internal { kind, detail } => {
                tracing::error!(kind = %kind, "Internal error: {}", detail);
                ErrorResponse::internal_error().with_kind(kind.to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            ErrorKind::InvalidInput => AppError::BadRequest(err.to_string()),
            kind => AppError::Internal {
                kind,
                detail: err.to_string(),
            },
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
