// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence across sessions with the file-backed store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use workout_map_log::db::{keys, FileStore, KeyValueStore};
use workout_map_log::models::{Coords, LoggedWorkout, WorkoutKind};
use workout_map_log::services::tracker::RawInput;
use workout_map_log::services::{
    FormSubmission, MapState, PageView, TrackerSettings, WorkoutRepository, WorkoutTracker,
};

/// Unique scratch directory per test.
fn scratch_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("workout-map-log-test-{name}-{nanos}"))
}

fn session(dir: &Path) -> WorkoutTracker {
    WorkoutTracker::new(
        WorkoutRepository::new(Arc::new(FileStore::new(dir))),
        MapState::default(),
        PageView::default(),
        TrackerSettings::default(),
    )
}

fn form(kind: &str, distance: f64, duration: f64, specific: f64) -> FormSubmission {
    let mut form = FormSubmission {
        kind: kind.to_string(),
        distance: RawInput::Number(distance),
        duration: RawInput::Number(duration),
        ..FormSubmission::default()
    };
    match kind {
        "running" => form.cadence = RawInput::Number(specific),
        _ => form.elevation = RawInput::Number(specific),
    }
    form
}

#[test]
fn test_workouts_survive_restart() {
    let dir = scratch_dir("restart");

    let created = {
        let mut tracker = session(&dir);
        assert_eq!(tracker.restore().unwrap(), 0);
        tracker.on_location_fix(Ok(Coords::new(0.0, 0.0))).unwrap();

        tracker.on_map_click(Coords::new(10.0, 20.0)).unwrap();
        tracker.submit(&form("running", 5.0, 30.0, 180.0)).unwrap();
        tracker.on_map_click(Coords::new(11.0, 21.0)).unwrap();
        tracker.submit(&form("cycling", 20.0, 60.0, -50.0)).unwrap();
        tracker.records()
    };

    let mut tracker = session(&dir);
    assert_eq!(tracker.restore().unwrap(), 2);

    // Same ordered flat records, restored as plain data
    assert_eq!(tracker.records(), created);
    assert!(tracker
        .workouts()
        .iter()
        .all(|w| matches!(w, LoggedWorkout::Restored(_))));
    assert_eq!(tracker.workouts()[0].kind(), WorkoutKind::Running);
    assert_eq!(tracker.workouts()[1].kind(), WorkoutKind::Cycling);

    // Newest first in the rendered list, no markers without a map pass
    assert_eq!(tracker.view().list()[0].kind, WorkoutKind::Cycling);
    assert!(tracker.map().markers.is_empty());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_new_workout_appends_after_restored_ones() {
    let dir = scratch_dir("append");
    {
        let mut tracker = session(&dir);
        tracker.restore().unwrap();
        tracker.on_location_fix(Ok(Coords::new(0.0, 0.0))).unwrap();
        tracker.on_map_click(Coords::new(1.0, 1.0)).unwrap();
        tracker.submit(&form("running", 5.0, 30.0, 180.0)).unwrap();
    }

    let mut tracker = session(&dir);
    tracker.restore().unwrap();
    tracker.on_location_fix(Ok(Coords::new(0.0, 0.0))).unwrap();
    tracker.on_map_click(Coords::new(2.0, 2.0)).unwrap();
    tracker.submit(&form("cycling", 10.0, 30.0, 0.0)).unwrap();

    let stored = WorkoutRepository::new(Arc::new(FileStore::new(&dir)))
        .load()
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].kind, WorkoutKind::Running);
    assert_eq!(stored[1].kind, WorkoutKind::Cycling);
    assert_eq!(stored[1].coords, Coords::new(2.0, 2.0));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_reset_on_empty_store_is_ok() {
    let dir = scratch_dir("reset");
    let mut tracker = session(&dir);
    tracker.restore().unwrap();

    tracker.reset().unwrap();
    tracker.reset().unwrap();

    assert!(tracker.workouts().is_empty());
    assert_eq!(FileStore::new(&dir).get(keys::WORKOUTS).unwrap(), None);
}
