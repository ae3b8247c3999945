// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page event routes.
//!
//! Each page event (location fix, map click, kind change, form submit,
//! list click, reset) is one request that runs one tracker transition and
//! returns the updated page state.

use crate::error::{AppError, Result};
use crate::models::{Coords, WorkoutId, WorkoutKind, WorkoutRecord};
use crate::services::location::LocationError;
use crate::services::map::MapState;
use crate::services::presenter::{FormView, ListItem, Notice};
use crate::services::{FormSubmission, Phase, Recenter, WorkoutTracker};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/workouts", get(list_workouts).post(submit_workout))
        .route("/api/workouts/{id}/recenter", post(recenter_workout))
        .route("/api/location", post(report_location))
        .route("/api/map/click", post(map_click))
        .route("/api/form/kind", put(change_kind))
        .route("/api/form/cancel", post(cancel_form))
        .route("/api/reset", post(reset_all))
}

// ─── Page State ──────────────────────────────────────────────

/// Everything the page needs to draw itself.
#[derive(Serialize)]
pub struct PageStateResponse {
    pub phase: Phase,
    pub form: FormView,
    /// Rendered list items, top of the page first
    pub workouts: Vec<ListItem>,
    pub map: MapState,
    pub notices: Vec<Notice>,
}

impl PageStateResponse {
    fn from_tracker(tracker: &WorkoutTracker) -> Self {
        Self {
            phase: tracker.phase(),
            form: tracker.view().form().clone(),
            workouts: tracker.view().list().to_vec(),
            map: tracker.map().clone(),
            notices: tracker.view().notices().to_vec(),
        }
    }
}

async fn get_state(State(state): State<Arc<AppState>>) -> Json<PageStateResponse> {
    let tracker = state.tracker.lock().await;
    Json(PageStateResponse::from_tracker(&tracker))
}

/// Stored workout records, oldest first.
async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<Vec<WorkoutRecord>> {
    Json(state.tracker.lock().await.records())
}

// ─── Map & Location ──────────────────────────────────────────

/// Browser geolocation result. `unsupported` is set when the browser has
/// no geolocation API at all.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum LocationReport {
    Fix {
        lat: f64,
        lng: f64,
    },
    Failure {
        error: String,
        #[serde(default)]
        unsupported: bool,
    },
}

async fn report_location(
    State(state): State<Arc<AppState>>,
    Json(report): Json<LocationReport>,
) -> Result<Json<PageStateResponse>> {
    let fix = match report {
        LocationReport::Fix { lat, lng } => Ok(Coords::new(lat, lng)),
        LocationReport::Failure {
            unsupported: true, ..
        } => Err(LocationError::Unsupported),
        LocationReport::Failure { error, .. } => Err(LocationError::Unavailable(error)),
    };

    let mut tracker = state.tracker.lock().await;
    tracker.on_location_fix(fix)?;
    Ok(Json(PageStateResponse::from_tracker(&tracker)))
}

#[derive(Deserialize)]
pub struct MapClickRequest {
    pub lat: f64,
    pub lng: f64,
}

async fn map_click(
    State(state): State<Arc<AppState>>,
    Json(click): Json<MapClickRequest>,
) -> Result<Json<PageStateResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.on_map_click(Coords::new(click.lat, click.lng))?;
    Ok(Json(PageStateResponse::from_tracker(&tracker)))
}

// ─── Form ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct KindChange {
    pub kind: String,
}

async fn change_kind(
    State(state): State<Arc<AppState>>,
    Json(change): Json<KindChange>,
) -> Result<Json<PageStateResponse>> {
    let kind = change
        .kind
        .parse::<WorkoutKind>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut tracker = state.tracker.lock().await;
    tracker.toggle_kind(kind);
    Ok(Json(PageStateResponse::from_tracker(&tracker)))
}

async fn cancel_form(State(state): State<Arc<AppState>>) -> Result<Json<PageStateResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.cancel_form()?;
    Ok(Json(PageStateResponse::from_tracker(&tracker)))
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub workout: WorkoutRecord,
    pub state: PageStateResponse,
}

/// Form submit. Validation failures leave the form open (422).
async fn submit_workout(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FormSubmission>,
) -> Result<Json<SubmitResponse>> {
    let response = state
        .with_tracker_blocking(move |tracker| {
            let workout = tracker.submit(&form)?;
            Ok(SubmitResponse {
                workout,
                state: PageStateResponse::from_tracker(tracker),
            })
        })
        .await?;
    Ok(Json(response))
}

// ─── List ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecenterResponse {
    pub outcome: Recenter,
    pub map: MapState,
}

/// List click. An unknown ID is not an error.
async fn recenter_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<RecenterResponse> {
    let mut tracker = state.tracker.lock().await;
    let outcome = tracker.recenter(&WorkoutId::from(id.as_str()));
    Json(RecenterResponse {
        outcome,
        map: tracker.map().clone(),
    })
}

// ─── Reset ───────────────────────────────────────────────────

/// Wipe storage and start over, including a fresh location fix when a
/// position is configured.
async fn reset_all(State(state): State<Arc<AppState>>) -> Result<Json<PageStateResponse>> {
    state
        .with_tracker_blocking(|tracker| Ok(tracker.reset()?))
        .await?;
    tracing::info!("Reset requested by page");

    if let Err(e) = state.locate().await {
        tracing::warn!(error = %e, "Location fix after reset failed");
    }

    let tracker = state.tracker.lock().await;
    Ok(Json(PageStateResponse::from_tracker(&tracker)))
}
