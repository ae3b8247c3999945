// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod location;
pub mod map;
pub mod persistence;
pub mod presenter;
pub mod tracker;
pub mod validation;

pub use location::{ConfiguredLocation, LocationError, LocationService};
pub use map::{MapState, MapSurface};
pub use persistence::WorkoutRepository;
pub use presenter::{PageView, WorkoutView};
pub use tracker::{FormSubmission, Phase, Recenter, TrackerError, TrackerSettings, WorkoutTracker};
