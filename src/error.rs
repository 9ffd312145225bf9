//! Error types for the Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes carried in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    BadValue = 5,
    RecordReferenced = 6,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A delete was refused because other records still reference the row
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Anonymous access to protected pages is refused outright
            AppError::Authentication(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Integrity(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Authentication(msg) => (ErrorCode::NotAuthenticated, msg.clone()),
            AppError::NotFound(msg) => (ErrorCode::NoSuchRecord, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (ErrorCode::BadValue, msg.clone())
            }
            AppError::Integrity(msg) => (ErrorCode::RecordReferenced, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (ErrorCode::DbFailure, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (ErrorCode::Failure, "Internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
