// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Map Log: log runs and rides at places picked on a map
//!
//! This crate provides the backend for the map page: the workout model,
//! input validation, persistence of the workout collection, and the
//! interaction state machine the page drives over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KeyValueStore;
use error::AppError;
use services::{
    ConfiguredLocation, LocationService, MapState, PageView, TrackerError, WorkoutRepository,
    WorkoutTracker,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tracker: Mutex<WorkoutTracker>,
    pub location: Option<ConfiguredLocation>,
}

impl AppState {
    /// Build the state around a storage backend. Nothing is loaded yet;
    /// call [`AppState::start`] before serving.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let tracker = WorkoutTracker::new(
            WorkoutRepository::new(store),
            MapState::default(),
            PageView::new(config.form_redisplay_delay_ms),
            config.tracker_settings(),
        );
        let location = config.home_position.map(ConfiguredLocation::new);

        Self {
            config,
            tracker: Mutex::new(tracker),
            location,
        }
    }

    /// Startup: restore the stored collection, then take a location fix if
    /// a location source is configured.
    ///
    /// A restore failure is logged and surfaced as a notice; the session
    /// continues with an empty collection.
    pub async fn start(&self) -> Result<(), TrackerError> {
        if let Err(e) = self.tracker.lock().await.restore() {
            tracing::warn!(error = %e, "Starting with an empty workout log");
        }
        self.locate().await
    }

    /// Take a location fix from the configured source, if any.
    ///
    /// The fix is awaited before the tracker lock is taken so a slow fix
    /// never blocks page events.
    pub async fn locate(&self) -> Result<(), TrackerError> {
        let Some(location) = &self.location else {
            tracing::info!("No configured position; waiting for the page to report a fix");
            return Ok(());
        };
        let fix = location.current_position().await;
        self.tracker.lock().await.on_location_fix(fix)
    }

    /// Run a tracker transition that writes storage on the blocking pool.
    ///
    /// Storage backends are synchronous; the write happens off the async
    /// workers while the tracker lock is held.
    pub async fn with_tracker_blocking<T, F>(self: &Arc<Self>, f: F) -> error::Result<T>
    where
        F: FnOnce(&mut WorkoutTracker) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut tracker = state.tracker.blocking_lock();
            f(&mut tracker)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Tracker task failed")))?
    }
}
