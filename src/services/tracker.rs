// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout tracker: the interaction state machine.
//!
//! Handles the page flow:
//! 1. Wait for a location fix, then create the map
//! 2. Map click opens the form at the clicked coordinates
//! 3. Submit validates, builds the workout, persists the full collection,
//!    then renders its marker and list item
//!
//! The tracker owns the collection. Storage and the rendered list are views
//! of it and are updated on every mutation.

use crate::db::StorageError;
use crate::models::{Coords, LoggedWorkout, Workout, WorkoutId, WorkoutKind, WorkoutRecord};
use crate::services::location::LocationError;
use crate::services::map::{MapState, MapSurface, PanOptions, DEFAULT_ZOOM};
use crate::services::persistence::WorkoutRepository;
use crate::services::presenter::{marker_for, PageView, WorkoutView};
use crate::services::validation::{self, ValidationError, REJECTION_MESSAGE};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Notice shown when the location fix fails.
pub const LOCATION_NOTICE: &str = "Position could not be reached";
/// Notice shown when the collection cannot be written.
pub const SAVE_FAILED_NOTICE: &str = "Workout could not be saved";
/// Notice shown when the stored collection cannot be read.
pub const LOAD_FAILED_NOTICE: &str = "Saved workouts could not be read";

/// The map click that opened the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapClick {
    pub coords: Coords,
    pub received_at: DateTime<Utc>,
}

/// Interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    AwaitingLocation,
    MapReady,
    FormOpen { click: MapClick },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingLocation => "awaiting_location",
            Phase::MapReady => "map_ready",
            Phase::FormOpen { .. } => "form_open",
        }
    }
}

/// A raw form value: the page sends input text, but plain JSON numbers are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Number(f64),
    Text(String),
}

impl Default for RawInput {
    fn default() -> Self {
        RawInput::Text(String::new())
    }
}

impl RawInput {
    pub fn to_number(&self) -> f64 {
        match self {
            RawInput::Number(n) => *n,
            RawInput::Text(s) => validation::parse_field(s),
        }
    }
}

/// Form submission as read from the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSubmission {
    pub kind: String,
    #[serde(default)]
    pub distance: RawInput,
    #[serde(default)]
    pub duration: RawInput,
    #[serde(default)]
    pub cadence: RawInput,
    #[serde(default)]
    pub elevation: RawInput,
}

/// Outcome of a list click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recenter {
    Panned,
    /// Unknown ID or no map yet: nothing happened.
    Ignored,
}

/// Tracker tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    pub zoom: u8,
    pub pan_duration_secs: f64,
    /// Place markers for already-logged workouts once the map is ready.
    pub restore_markers: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan_duration_secs: 1.0,
            restore_markers: false,
        }
    }
}

/// The interaction state machine. One instance per session.
pub struct WorkoutTracker<M: MapSurface = MapState, V: WorkoutView = PageView> {
    phase: Phase,
    workouts: Vec<LoggedWorkout>,
    repository: WorkoutRepository,
    map: M,
    view: V,
    settings: TrackerSettings,
    restored: bool,
    /// The stored blob failed to load and has not been backed up yet.
    unreadable_blob: bool,
}

impl<M: MapSurface, V: WorkoutView> WorkoutTracker<M, V> {
    pub fn new(repository: WorkoutRepository, map: M, view: V, settings: TrackerSettings) -> Self {
        Self {
            phase: Phase::AwaitingLocation,
            workouts: Vec::new(),
            repository,
            map,
            view,
            settings,
            restored: false,
            unreadable_blob: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn workouts(&self) -> &[LoggedWorkout] {
        &self.workouts
    }

    /// Flat records in collection order (oldest first).
    pub fn records(&self) -> Vec<WorkoutRecord> {
        self.workouts.iter().map(|w| w.record().into_owned()).collect()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Load the stored collection and render each entry as a list item.
    ///
    /// Runs once per session, before anything else is rendered. Markers are
    /// not created here. On a read failure the session starts empty and the
    /// error is surfaced. The unreadable blob is backed up before the first
    /// save replaces it.
    pub fn restore(&mut self) -> Result<usize, TrackerError> {
        if self.restored {
            return Err(TrackerError::InvalidTransition {
                event: "restore",
                phase: self.phase.name(),
            });
        }
        self.restored = true;

        let records = match self.repository.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load stored workouts");
                self.unreadable_blob = true;
                self.view.notify_error(LOAD_FAILED_NOTICE);
                return Err(TrackerError::Persistence(e));
            }
        };

        for record in &records {
            self.view.render_list_item(record);
        }
        let count = records.len();
        self.workouts = records.into_iter().map(LoggedWorkout::Restored).collect();

        tracing::info!(count, "Restored workouts");
        Ok(count)
    }

    /// Apply the result of a location fix.
    pub fn on_location_fix(
        &mut self,
        fix: Result<Coords, LocationError>,
    ) -> Result<(), TrackerError> {
        self.expect_phase("location_fix", |p| matches!(p, Phase::AwaitingLocation))?;

        let center = match fix {
            Ok(center) => center,
            Err(e) => {
                tracing::warn!(error = %e, "Location fix failed");
                self.view.notify_error(LOCATION_NOTICE);
                return Err(TrackerError::LocationUnavailable(e));
            }
        };

        self.map.create_map(center, self.settings.zoom);
        self.phase = Phase::MapReady;

        if self.settings.restore_markers {
            for logged in &self.workouts {
                self.map.add_marker(marker_for(&logged.record()));
            }
        }

        tracing::info!(lat = center.lat, lng = center.lng, "Map ready");
        Ok(())
    }

    /// A click on the map opens the form at the clicked coordinates. A new
    /// click while the form is open replaces the captured coordinates.
    pub fn on_map_click(&mut self, coords: Coords) -> Result<(), TrackerError> {
        self.expect_phase("map_click", |p| {
            matches!(p, Phase::MapReady | Phase::FormOpen { .. })
        })?;

        self.phase = Phase::FormOpen {
            click: MapClick {
                coords,
                received_at: Utc::now(),
            },
        };
        self.view.show_form();

        tracing::debug!(lat = coords.lat, lng = coords.lng, "Form opened");
        Ok(())
    }

    /// Swap the kind-specific input shown in the form. Phase and captured
    /// coordinates are unchanged.
    pub fn toggle_kind(&mut self, kind: WorkoutKind) {
        self.view.toggle_kind_fields(kind);
    }

    /// Close the form without creating anything.
    pub fn cancel_form(&mut self) -> Result<(), TrackerError> {
        self.expect_phase("cancel", |p| matches!(p, Phase::FormOpen { .. }))?;
        self.view.clear_and_hide_form();
        self.phase = Phase::MapReady;
        Ok(())
    }

    /// Submit the form, timestamping the workout with the local clock.
    pub fn submit(&mut self, form: &FormSubmission) -> Result<WorkoutRecord, TrackerError> {
        self.submit_at(form, &Local::now())
    }

    /// Submit the form with an explicit creation time.
    ///
    /// On any failure nothing changes: no entry, no render, no write (a
    /// failed write is rolled back before returning). Inputs whose pace or
    /// speed is not a finite number are rejected like invalid inputs.
    pub fn submit_at<Tz: TimeZone>(
        &mut self,
        form: &FormSubmission,
        now: &DateTime<Tz>,
    ) -> Result<WorkoutRecord, TrackerError>
    where
        Tz::Offset: Display,
    {
        let Phase::FormOpen { click } = self.phase else {
            return Err(TrackerError::InvalidTransition {
                event: "submit",
                phase: self.phase.name(),
            });
        };

        let kind = form
            .kind
            .parse::<WorkoutKind>()
            .map_err(|e| TrackerError::UnknownKind(e.0))?;
        let distance = form.distance.to_number();
        let duration = form.duration.to_number();
        let specific = match kind {
            WorkoutKind::Running => form.cadence.to_number(),
            WorkoutKind::Cycling => form.elevation.to_number(),
        };

        if let Err(e) = validation::validate(kind, distance, duration, specific) {
            tracing::warn!(%kind, distance, duration, specific, "Rejected workout input");
            self.view.notify_error(REJECTION_MESSAGE);
            return Err(TrackerError::Validation(e));
        }

        let workout = self.build_unique(kind, click.coords, distance, duration, specific, now);
        if !workout.derived_metric().is_finite() {
            tracing::warn!(%kind, distance, duration, "Rejected workout: metric out of range");
            self.view.notify_error(REJECTION_MESSAGE);
            return Err(TrackerError::Validation(ValidationError { kind }));
        }

        if self.unreadable_blob {
            if let Err(e) = self.repository.back_up_unreadable() {
                tracing::error!(error = %e, "Not overwriting unreadable workouts");
                self.view.notify_error(SAVE_FAILED_NOTICE);
                return Err(TrackerError::Persistence(e));
            }
            self.unreadable_blob = false;
        }

        let record = WorkoutRecord::from(&workout);
        self.workouts.push(LoggedWorkout::Created(workout));

        if let Err(e) = self.repository.save(&self.records()) {
            self.workouts.pop();
            tracing::error!(error = %e, "Failed to persist workouts");
            self.view.notify_error(SAVE_FAILED_NOTICE);
            return Err(TrackerError::Persistence(e));
        }

        self.map.add_marker(marker_for(&record));
        self.view.render_list_item(&record);
        self.view.clear_and_hide_form();
        self.phase = Phase::MapReady;

        tracing::info!(
            id = %record.id,
            %kind,
            count = self.workouts.len(),
            "Workout logged"
        );
        Ok(record)
    }

    /// Pan the map to a workout from the list. Unknown IDs are ignored.
    pub fn recenter(&mut self, id: &WorkoutId) -> Recenter {
        if !self.map.is_ready() {
            tracing::debug!(%id, "Recenter ignored: map not ready");
            return Recenter::Ignored;
        }
        let Some(target) = self.workouts.iter().find(|w| w.id() == id).map(|w| w.coords()) else {
            tracing::debug!(%id, "Recenter ignored: unknown workout");
            return Recenter::Ignored;
        };

        self.map.pan_to(
            target,
            self.settings.zoom,
            PanOptions {
                animate: true,
                duration_seconds: self.settings.pan_duration_secs,
            },
        );
        Recenter::Panned
    }

    /// Wipe storage and the collection, then start over from
    /// `AwaitingLocation` with a fresh restore.
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        self.repository.clear().map_err(|e| {
            tracing::error!(error = %e, "Failed to clear stored workouts");
            TrackerError::Persistence(e)
        })?;

        self.workouts.clear();
        self.map.reset();
        self.view.reset();
        self.phase = Phase::AwaitingLocation;
        self.restored = false;
        self.unreadable_blob = false;
        self.restore()?;

        tracing::info!("Workout log reset");
        Ok(())
    }

    fn expect_phase(
        &self,
        event: &'static str,
        allowed: impl Fn(&Phase) -> bool,
    ) -> Result<(), TrackerError> {
        if allowed(&self.phase) {
            Ok(())
        } else {
            tracing::debug!(event, phase = self.phase.name(), "Event ignored in phase");
            Err(TrackerError::InvalidTransition {
                event,
                phase: self.phase.name(),
            })
        }
    }

    /// Build a workout whose ID is not yet in the collection. IDs derive
    /// from the creation timestamp, so a collision moves the timestamp
    /// forward by a millisecond.
    fn build_unique<Tz: TimeZone>(
        &self,
        kind: WorkoutKind,
        coords: Coords,
        distance: f64,
        duration: f64,
        specific: f64,
        now: &DateTime<Tz>,
    ) -> Workout
    where
        Tz::Offset: Display,
    {
        let mut created_at = now.clone();
        loop {
            let workout = match kind {
                WorkoutKind::Running => {
                    Workout::running(coords, distance, duration, specific, &created_at)
                }
                WorkoutKind::Cycling => {
                    Workout::cycling(coords, distance, duration, specific, &created_at)
                }
            };
            if !self.workouts.iter().any(|w| w.id() == workout.id()) {
                return workout;
            }
            created_at = created_at + Duration::milliseconds(1);
        }
    }
}

/// Errors from tracker transitions.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    LocationUnavailable(#[from] LocationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown workout kind: {0:?}")]
    UnknownKind(String),

    #[error("Cannot handle {event} while {phase}")]
    InvalidTransition {
        event: &'static str,
        phase: &'static str,
    },

    #[error(transparent)]
    Persistence(#[from] StorageError),
}
