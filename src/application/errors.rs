use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::RepositoryError;

/// Application-level failure taxonomy. Each variant maps onto one HTTP status;
/// `Unexpected` keeps its detail server-side and renders a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    NotAuthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UploadProvider(String),
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        AppError::NotAuthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        AppError::Unexpected(message.into())
    }

    const fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateEmail
            | AppError::DuplicateUsername
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UploadProvider(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::not_found("Not found"),
            RepositoryError::DuplicateEmail => AppError::DuplicateEmail,
            RepositoryError::DuplicateUsername => AppError::DuplicateUsername,
            RepositoryError::Unexpected(message) => AppError::Unexpected(message),
        }
    }
}

/// Boundary wrapper that renders an [`AppError`] as the API's JSON error shape.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();

        // Unexpected detail is logged, never sent to the client.
        let message = if let AppError::Unexpected(detail) = &self.0 {
            error!(error = %detail, "request failed unexpectedly");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
