// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flat workout records as persisted in storage.

use crate::models::workout::{Coords, Workout, WorkoutId, WorkoutKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Stored workout record.
///
/// Kind-specific fields are only present for the matching kind. Aliases
/// accept blobs written with the older page field names
/// (`type`, `details`, `date`, `elevation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: WorkoutId,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    /// Kilometers
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    #[serde(alias = "type")]
    pub kind: WorkoutKind,
    #[serde(alias = "details")]
    pub description: String,
    /// Steps per minute (running)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    /// Minutes per kilometer (running)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    /// Meters (cycling)
    #[serde(default, alias = "elevation", skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    /// Kilometers per hour (cycling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let base = workout.base();
        let mut record = WorkoutRecord {
            id: base.id().clone(),
            created_at: base.created_at(),
            coords: base.coords(),
            distance: base.distance(),
            duration: base.duration(),
            kind: workout.kind(),
            description: base.description().to_string(),
            cadence: None,
            pace: None,
            elevation_gain: None,
            speed: None,
        };
        match workout {
            Workout::Running(run) => {
                record.cadence = Some(run.cadence());
                record.pace = Some(run.pace());
            }
            Workout::Cycling(ride) => {
                record.elevation_gain = Some(ride.elevation_gain());
                record.speed = Some(ride.speed());
            }
        }
        record
    }
}

/// An entry of the in-memory collection.
///
/// Entries created this session keep their typed form. Entries restored
/// from storage stay flat records: their derived values are trusted as
/// stored and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggedWorkout {
    Created(Workout),
    Restored(WorkoutRecord),
}

impl LoggedWorkout {
    pub fn id(&self) -> &WorkoutId {
        match self {
            LoggedWorkout::Created(w) => w.id(),
            LoggedWorkout::Restored(r) => &r.id,
        }
    }

    pub fn coords(&self) -> Coords {
        match self {
            LoggedWorkout::Created(w) => w.coords(),
            LoggedWorkout::Restored(r) => r.coords,
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self {
            LoggedWorkout::Created(w) => w.kind(),
            LoggedWorkout::Restored(r) => r.kind,
        }
    }

    /// Flat view used for rendering and persistence.
    pub fn record(&self) -> Cow<'_, WorkoutRecord> {
        match self {
            LoggedWorkout::Created(w) => Cow::Owned(WorkoutRecord::from(w)),
            LoggedWorkout::Restored(r) => Cow::Borrowed(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_running_record_fields() {
        let w = Workout::running(Coords::new(10.0, 20.0), 5.0, 30.0, 180.0, &created_at());
        let json = serde_json::to_value(WorkoutRecord::from(&w)).unwrap();

        assert_eq!(json["kind"], "running");
        assert_eq!(json["coords"], serde_json::json!([10.0, 20.0]));
        assert_eq!(json["cadence"], 180.0);
        assert_eq!(json["pace"], 6.0);
        assert_eq!(json["description"], "Running on October 14");
        assert_eq!(json["createdAt"], "2026-10-14T12:00:00Z");
        assert!(json.get("speed").is_none());
        assert!(json.get("elevationGain").is_none());
    }

    #[test]
    fn test_cycling_record_fields() {
        let w = Workout::cycling(Coords::new(1.0, 2.0), 20.0, 60.0, 0.0, &created_at());
        let json = serde_json::to_value(WorkoutRecord::from(&w)).unwrap();

        assert_eq!(json["kind"], "cycling");
        assert_eq!(json["elevationGain"], 0.0);
        assert_eq!(json["speed"], 20.0);
        assert!(json.get("cadence").is_none());
        assert!(json.get("pace").is_none());
    }

    #[test]
    fn test_legacy_field_names_accepted() {
        let legacy = r#"{
            "date": "2024-05-01T08:15:00.000Z",
            "id": "4539012345",
            "coords": [51.5, -0.12],
            "distance": 12,
            "duration": 40,
            "type": "cycling",
            "elevation": 120,
            "speed": 18,
            "details": "Cycling on May 1"
        }"#;
        let record: WorkoutRecord = serde_json::from_str(legacy).unwrap();

        assert_eq!(record.kind, WorkoutKind::Cycling);
        assert_eq!(record.elevation_gain, Some(120.0));
        assert_eq!(record.description, "Cycling on May 1");
        assert_eq!(record.coords, Coords::new(51.5, -0.12));
    }

    #[test]
    fn test_restored_stored_values_are_trusted() {
        let record = WorkoutRecord {
            id: WorkoutId::from("1"),
            created_at: created_at(),
            coords: Coords::new(0.0, 0.0),
            distance: 5.0,
            duration: 30.0,
            kind: WorkoutKind::Running,
            description: "Running on October 14".to_string(),
            cadence: Some(180.0),
            // Deliberately not duration / distance
            pace: Some(7.5),
            elevation_gain: None,
            speed: None,
        };
        let logged = LoggedWorkout::Restored(record);

        assert_eq!(logged.record().pace, Some(7.5));
    }
}
