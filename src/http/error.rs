//! Error taxonomy for client-facing responses.
//!
//! Validation failures map to 400, rate limit rejections to 429. Every
//! error renders as structured JSON; none are fatal to the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to clients as structured JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Missing parameter 'n'")]
    MissingParameter,

    #[error("Parameter 'n' must be an integer")]
    NotAnInteger,

    #[error("Parameter 'n' must be a non-negative integer")]
    Negative,

    #[error("Parameter 'n' must be at most {0}")]
    AboveMaximum(u32),

    #[error("Rate limit exceeded")]
    RateLimited { description: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::RateLimited { description } => json!({
                "error": "Rate limit exceeded",
                "description": description,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
