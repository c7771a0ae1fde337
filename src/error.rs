use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures a request can surface to the client.
///
/// Duplicate-key rejections during profile creation are recovered inside
/// the profile service and never reach this type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing Authorization header")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid token payload")]
    BadPayload,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("database unreachable: {0}")]
    Connection(sqlx::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::BadPayload | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AccountNotFound | ApiError::ProfileNotFound => StatusCode::NOT_FOUND,
            ApiError::Connection(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
