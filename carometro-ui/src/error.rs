//! Error types for carometro-ui
//!
//! Error bodies are `{"error": "<message>"}`. Server-side failures use a
//! generic message; the cause is logged, not returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_IDENTITY: &str = "Invalid student identity";
pub const SAVE_FAILED: &str = "Failed to save photo";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Photo could not be decoded or written (500)
    #[error("Photo save failed: {0}")]
    SaveFailed(String),

    /// carometro-common error
    #[error("Common error: {0}")]
    Common(#[from] carometro_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::SaveFailed(cause) => {
                error!("Error saving photo: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED.to_string())
            }
            ApiError::Common(carometro_common::Error::InvalidIdentity(cause)) => {
                warn!("Rejected photo save: {}", cause);
                (StatusCode::BAD_REQUEST, INVALID_IDENTITY.to_string())
            }
            ApiError::Common(err) => {
                error!("Error saving photo: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
