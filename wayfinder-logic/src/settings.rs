use serde::{Deserialize, Serialize};

use super::location::Coordinate;

#[derive(Debug, Clone, Serialize, Deserialize, specta::Type)]
/// Settings for the live-map screen, handed over by the UI at mount
pub struct MapSettings {
    /// Keep the map centered on the user by re-fixing on an interval
    pub follow: bool,
    /// Seconds between fixes while following
    pub refresh_interval_seconds: u32,
    /// Latitude span of the visible region
    pub latitude_delta: f64,
    /// Longitude span of the visible region
    pub longitude_delta: f64,
    /// Static campus-map image to lay over the map, if any
    pub overlay: Option<CampusOverlay>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            follow: false,
            refresh_interval_seconds: 5,
            latitude_delta: 0.015,
            longitude_delta: 0.0121,
            overlay: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, specta::Type)]
/// Placement of a static campus-map image on the map
pub struct CampusOverlay {
    /// Frontend asset the image is loaded from
    pub asset: String,
    pub bounds: OverlayBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// Geographic rectangle the overlay image is stretched across
pub struct OverlayBounds {
    pub north_east: Coordinate,
    pub south_west: Coordinate,
}
