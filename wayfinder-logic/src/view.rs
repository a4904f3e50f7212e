use serde::{Deserialize, Serialize};

use crate::{
    location::{Coordinate, Fix, UtcDT},
    settings::{CampusOverlay, MapSettings},
};

/// State published by the trackers. The location task writes the coordinate,
/// the orientation task writes the heading, the renderer only reads.
#[derive(Debug, Clone, Default)]
pub struct MapViewState {
    /// Current position, [Coordinate::UNKNOWN] until the first fix
    pub coordinate: Coordinate,
    /// Marker rotation in degrees
    pub heading: f64,
    /// Timestamp of the fix the coordinate came from
    pub fixed_at: Option<UtcDT>,
}

impl MapViewState {
    /// Overwrite the coordinate with a resolved fix, exactly as reported
    pub fn apply_fix(&mut self, fix: Fix) {
        self.coordinate = fix.coords;
        self.fixed_at = Some(fix.timestamp);
    }

    pub fn apply_heading(&mut self, heading: f64) {
        self.heading = heading;
    }

    pub fn as_ui_state(&self, settings: &MapSettings) -> MapUiState {
        MapUiState {
            region: Region::around(self.coordinate, settings),
            marker: MarkerState {
                coordinate: self.coordinate,
                heading: self.heading,
            },
            overlay: settings.overlay.clone(),
            fixed_at: self.fixed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// The visible map viewport, a center plus latitude/longitude spans
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn around(center: Coordinate, settings: &MapSettings) -> Self {
        Self {
            center,
            latitude_delta: settings.latitude_delta,
            longitude_delta: settings.longitude_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// The directional marker: where it sits and how far it is rotated
pub struct MarkerState {
    pub coordinate: Coordinate,
    /// Rotation in degrees, straight from the latest sensor sample
    pub heading: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, specta::Type)]
/// Snapshot handed to the renderer, request after each state update event
pub struct MapUiState {
    pub region: Region,
    pub marker: MarkerState,
    /// Static campus-map image placement, if configured
    pub overlay: Option<CampusOverlay>,
    /// When the shown coordinate was resolved, `None` while still on the
    /// sentinel
    pub fixed_at: Option<UtcDT>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn fix_is_applied_without_transformation() {
        let mut state = MapViewState::default();
        assert!(state.coordinate.is_unknown());
        assert!(state.fixed_at.is_none());

        let fix = Fix {
            coords: Coordinate::new(36.2721, -115.0110),
            timestamp: Utc::now(),
        };
        state.apply_fix(fix);

        assert_eq!(state.coordinate, Coordinate::new(36.2721, -115.0110));
        assert_eq!(state.fixed_at, Some(fix.timestamp));
    }

    #[test]
    fn ui_state_centers_region_on_the_coordinate() {
        let settings = MapSettings::default();
        let mut state = MapViewState::default();
        state.apply_fix(Fix {
            coords: Coordinate::new(45.5, -122.6),
            timestamp: Utc::now(),
        });
        state.apply_heading(90.0);

        let ui = state.as_ui_state(&settings);
        assert_eq!(ui.region.center, Coordinate::new(45.5, -122.6));
        assert_eq!(ui.region.latitude_delta, 0.015);
        assert_eq!(ui.region.longitude_delta, 0.0121);
        assert_eq!(ui.marker.coordinate, ui.region.center);
        assert_eq!(ui.marker.heading, 90.0);
        assert!(ui.overlay.is_none());
    }
}
