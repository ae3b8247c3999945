// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::TrackerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Rejected input: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    Conflict(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(e) => AppError::Validation(e.to_string()),
            TrackerError::UnknownKind(kind) => {
                AppError::BadRequest(format!("Unknown workout kind: {kind:?}"))
            }
            e @ TrackerError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            TrackerError::LocationUnavailable(e) => AppError::LocationUnavailable(e.to_string()),
            TrackerError::Persistence(e) => AppError::Storage(e.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::LocationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match &self {
            AppError::BadRequest(msg) => ("bad_request", Some(msg.clone())),
            AppError::Validation(msg) => ("validation_failed", Some(msg.clone())),
            AppError::Conflict(msg) => ("invalid_transition", Some(msg.clone())),
            AppError::LocationUnavailable(msg) => ("location_unavailable", Some(msg.clone())),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                ("storage_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
