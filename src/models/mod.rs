// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod record;
pub mod workout;

pub use record::{LoggedWorkout, WorkoutRecord};
pub use workout::{Coords, CyclingWorkout, RunningWorkout, Workout, WorkoutId, WorkoutKind};
