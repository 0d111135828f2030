//! REST API module for HTTP endpoints
//!
//! Provides:
//! - `GET /api/projects/:project_id/simple-events/` - Plain-text event download

pub mod events;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ExportError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        match self {
            ExportError::InvalidParameter(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message))).into_response()
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(other.to_string())),
            )
                .into_response(),
        }
    }
}
