//! Error types for the Rescate recovery service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    BadValue = 2,
    InvalidCode = 3,
    NoSuchUser = 4,
    StorageFailure = 5,
    DeliveryFailure = 6,
    BackendRejected = 7,
    BackendUnreachable = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Backend rejected request: {0}")]
    Backend(String),

    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::InvalidCode(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidCode, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser, msg.clone())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Delivery(msg) => {
                tracing::error!("Delivery error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::DeliveryFailure,
                    "Failed to deliver reset code".to_string(),
                )
            }
            // Backend rejections carry the backend's own message
            AppError::Backend(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BackendRejected, msg.clone())
            }
            AppError::BackendUnreachable(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::BackendUnreachable, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
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
