use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use std::fmt;

use crate::models::dtos::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    Validation(validator::ValidationErrors),
    InvalidInput(String),
    Auth(String),
    Forbidden(String),
    NotFound(String),
    InsufficientBalance,
    DomainInvariant(String),
    InvalidStateTransition(String),
    Duplicate(String),
    TransferFailed(String),
    /// A debit committed but the compensating credit could not be applied.
    /// Money has left a wallet with no confirmed destination; this is never
    /// retried silently and must be reviewed manually.
    Compensation(String),
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::InvalidInput(e) => write!(f, "Validation error: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::InsufficientBalance => write!(f, "Insufficient balance"),
            ApiError::DomainInvariant(e) => write!(f, "Invariant violation: {}", e),
            ApiError::InvalidStateTransition(e) => write!(f, "Invalid state transition: {}", e),
            ApiError::Duplicate(e) => write!(f, "Duplicate: {}", e),
            ApiError::TransferFailed(e) => write!(f, "Transfer failed: {}", e),
            ApiError::Compensation(e) => write!(f, "Compensation failed: {}", e),
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => ApiError::Duplicate(info.message().to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                format!("Validation error: {}", errors),
            ),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InsufficientBalance => {
                (StatusCode::BAD_REQUEST, "Insufficient balance".to_string())
            }
            ApiError::DomainInvariant(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InvalidStateTransition(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
            ApiError::TransferFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Transfer failed: {}", msg),
            ),
            ApiError::Compensation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Transfer failed and could not be reversed: {}", msg),
            ),
            ApiError::Database(e) => match e {
                diesel::result::Error::NotFound => {
                    (StatusCode::NOT_FOUND, "Record not found".to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                ),
            },
            ApiError::DatabaseConnection(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database connection error: {}", e),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = self.into();
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
