// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map surface seam.
//!
//! The page owns the tile library. The tracker drives a [`MapSurface`]; the
//! default implementation, [`MapState`], records the resulting view, markers
//! and pan commands so the page can mirror them.

use crate::models::Coords;
use serde::Serialize;

/// Default zoom level for the map and for recentering.
pub const DEFAULT_ZOOM: u8 = 13;

/// Popup size and behavior. Workout popups stay open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopupOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: 250,
            max_height: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// A marker with a bound, opened popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coords: Coords,
    pub popup_content: String,
    /// CSS class on the popup, e.g. "running-popup"
    pub popup_class: String,
    pub popup: PopupOptions,
}

/// Animation settings for a recenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_seconds: f64,
}

/// Operations the tracker needs from a map.
pub trait MapSurface {
    fn create_map(&mut self, center: Coords, zoom: u8);
    fn add_marker(&mut self, marker: Marker);
    fn pan_to(&mut self, target: Coords, zoom: u8, options: PanOptions);
    fn is_ready(&self) -> bool;
    /// Drop the map entirely (used by reset).
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coords,
    pub zoom: u8,
}

/// Last pan instruction. `sequence` increases on every pan so the page can
/// tell a repeated recenter from a stale one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanCommand {
    pub sequence: u64,
    pub target: Coords,
    pub zoom: u8,
    pub options: PanOptions,
}

/// Recorded map state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapState {
    pub viewport: Option<Viewport>,
    pub markers: Vec<Marker>,
    pub last_pan: Option<PanCommand>,
}

impl MapSurface for MapState {
    fn create_map(&mut self, center: Coords, zoom: u8) {
        self.viewport = Some(Viewport { center, zoom });
        self.markers.clear();
        self.last_pan = None;
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn pan_to(&mut self, target: Coords, zoom: u8, options: PanOptions) {
        let sequence = self.last_pan.map_or(1, |p| p.sequence + 1);
        self.viewport = Some(Viewport {
            center: target,
            zoom,
        });
        self.last_pan = Some(PanCommand {
            sequence,
            target,
            zoom,
            options,
        });
    }

    fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    fn reset(&mut self) {
        *self = MapState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAN: PanOptions = PanOptions {
        animate: true,
        duration_seconds: 1.0,
    };

    #[test]
    fn test_pan_moves_viewport_and_counts() {
        let mut map = MapState::default();
        assert!(!map.is_ready());

        map.create_map(Coords::new(1.0, 1.0), DEFAULT_ZOOM);
        map.pan_to(Coords::new(2.0, 2.0), DEFAULT_ZOOM, PAN);
        map.pan_to(Coords::new(2.0, 2.0), DEFAULT_ZOOM, PAN);

        assert!(map.is_ready());
        assert_eq!(map.viewport.unwrap().center, Coords::new(2.0, 2.0));
        assert_eq!(map.last_pan.unwrap().sequence, 2);
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut map = MapState::default();
        map.create_map(Coords::new(1.0, 1.0), DEFAULT_ZOOM);
        map.add_marker(Marker {
            coords: Coords::new(1.0, 1.0),
            popup_content: "x".to_string(),
            popup_class: "running-popup".to_string(),
            popup: PopupOptions::default(),
        });

        map.reset();
        assert_eq!(map, MapState::default());
    }
}
