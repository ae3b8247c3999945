// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use workout_map_log::db::StorageError;
use workout_map_log::error::AppError;
use workout_map_log::models::WorkoutKind;
use workout_map_log::services::location::LocationError;
use workout_map_log::services::validation::ValidationError;
use workout_map_log::services::TrackerError;

#[test]
fn test_tracker_errors_map_to_status() {
    let cases = [
        (
            TrackerError::Validation(ValidationError {
                kind: WorkoutKind::Running,
            }),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            TrackerError::UnknownKind("rowing".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            TrackerError::InvalidTransition {
                event: "submit",
                phase: "map_ready",
            },
            StatusCode::CONFLICT,
        ),
        (
            TrackerError::LocationUnavailable(LocationError::Unsupported),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            TrackerError::Persistence(StorageError::QuotaExceeded),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(AppError::from(err).status(), status);
    }
}

#[test]
fn test_invalid_transition_message() {
    let err = AppError::from(TrackerError::InvalidTransition {
        event: "submit",
        phase: "map_ready",
    });
    assert_eq!(
        err.to_string(),
        "Invalid transition: Cannot handle submit while map_ready"
    );
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let err = AppError::Internal(anyhow::anyhow!("task panicked").context("Tracker task failed"));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());
}

#[test]
fn test_storage_error_keeps_details() {
    let err = AppError::from(TrackerError::Persistence(StorageError::QuotaExceeded));
    assert_eq!(err.to_string(), "Storage error: Storage quota exceeded");
}
