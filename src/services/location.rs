// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location fix sources.

use crate::models::Coords;
use std::future::Future;

/// Resolves the current position once. No timeouts or retries.
pub trait LocationService {
    fn current_position(&self) -> impl Future<Output = Result<Coords, LocationError>> + Send;
}

/// A fixed position taken from configuration (`HOME_LAT` / `HOME_LNG`).
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation {
    position: Coords,
}

impl ConfiguredLocation {
    pub fn new(position: Coords) -> Self {
        Self { position }
    }
}

impl LocationService for ConfiguredLocation {
    fn current_position(&self) -> impl Future<Output = Result<Coords, LocationError>> + Send {
        let position = self.position;
        async move {
            if position.lat.is_finite() && position.lng.is_finite() {
                Ok(position)
            } else {
                Err(LocationError::Unavailable(
                    "configured position is not a finite coordinate".to_string(),
                ))
            }
        }
    }
}

/// The location fix failed. There is no structured reason beyond text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Position could not be reached: {0}")]
    Unavailable(String),

    #[error("Geolocation is not supported")]
    Unsupported,
}
