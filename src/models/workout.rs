// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout entry model: a run or a ride logged at a map location.
//!
//! Entries are fully formed at construction. Derived metrics (pace, speed)
//! and the description are computed once and never recomputed.

use crate::time_utils::calendar_day_label;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of trailing timestamp digits used for workout IDs.
const ID_DIGITS: usize = 10;

/// A (latitude, longitude) pair. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

/// Discriminant between the two supported activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase wire name ("running" / "cycling").
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Returned when a kind name is neither "running" nor "cycling".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown workout kind: {0:?}")]
pub struct UnknownKind(pub String);

/// Workout identifier, unique within one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Build an ID from the low-order digits of a millisecond timestamp.
    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        let millis = created_at.timestamp_millis().unsigned_abs().to_string();
        let start = millis.len().saturating_sub(ID_DIGITS);
        Self(millis[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields shared by every workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutBase {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coords,
    /// Kilometers
    distance: f64,
    /// Minutes
    duration: f64,
    description: String,
}

impl WorkoutBase {
    fn new<Tz: TimeZone>(
        kind: WorkoutKind,
        coords: Coords,
        distance: f64,
        duration: f64,
        created_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let utc = created_at.with_timezone(&Utc);
        Self {
            id: WorkoutId::from_timestamp(utc),
            created_at: utc,
            coords,
            distance,
            duration,
            description: format!("{} on {}", kind.label(), calendar_day_label(created_at)),
        }
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// "{Kind} on {Month} {day}", frozen at construction.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A run: cadence in steps/min, pace in min/km.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningWorkout {
    base: WorkoutBase,
    cadence: f64,
    pace: f64,
}

impl RunningWorkout {
    pub fn base(&self) -> &WorkoutBase {
        &self.base
    }

    pub fn cadence(&self) -> f64 {
        self.cadence
    }

    pub fn pace(&self) -> f64 {
        self.pace
    }
}

/// A ride: elevation gain in meters (may be negative), speed in km/h.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclingWorkout {
    base: WorkoutBase,
    elevation_gain: f64,
    speed: f64,
}

impl CyclingWorkout {
    pub fn base(&self) -> &WorkoutBase {
        &self.base
    }

    pub fn elevation_gain(&self) -> f64 {
        self.elevation_gain
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

/// A logged workout.
///
/// Construction never fails and performs no I/O; inputs are expected to
/// have passed [`crate::services::validation`] already.
#[derive(Debug, Clone, PartialEq)]
pub enum Workout {
    Running(RunningWorkout),
    Cycling(CyclingWorkout),
}

impl Workout {
    pub fn running<Tz: TimeZone>(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        created_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let base = WorkoutBase::new(WorkoutKind::Running, coords, distance, duration, created_at);
        Workout::Running(RunningWorkout {
            base,
            cadence,
            pace: duration / distance,
        })
    }

    pub fn cycling<Tz: TimeZone>(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        created_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let base = WorkoutBase::new(WorkoutKind::Cycling, coords, distance, duration, created_at);
        Workout::Cycling(CyclingWorkout {
            base,
            elevation_gain,
            speed: distance / (duration / 60.0),
        })
    }

    pub fn kind(&self) -> WorkoutKind {
        match self {
            Workout::Running(_) => WorkoutKind::Running,
            Workout::Cycling(_) => WorkoutKind::Cycling,
        }
    }

    pub fn base(&self) -> &WorkoutBase {
        match self {
            Workout::Running(r) => &r.base,
            Workout::Cycling(c) => &c.base,
        }
    }

    pub fn id(&self) -> &WorkoutId {
        self.base().id()
    }

    pub fn coords(&self) -> Coords {
        self.base().coords()
    }

    pub fn description(&self) -> &str {
        self.base().description()
    }

    /// Pace for a run, speed for a ride.
    pub fn derived_metric(&self) -> f64 {
        match self {
            Workout::Running(r) => r.pace,
            Workout::Cycling(c) => c.speed,
        }
    }
}
