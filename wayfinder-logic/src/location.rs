use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

/// A "part" of a coordinate
pub type CoordinateComponent = f64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, specta::Type)]
/// Some point on the globe as gotten from a Geolocation API
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: CoordinateComponent,
    /// Longitude in degrees
    pub longitude: CoordinateComponent,
}

impl Coordinate {
    /// Placeholder shown until the first real fix resolves
    pub const UNKNOWN: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: CoordinateComponent, longitude: CoordinateComponent) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether this is still the placeholder value
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A single resolved position report from the location service
pub struct Fix {
    pub coords: Coordinate,
    /// When the service resolved the position
    pub timestamp: UtcDT,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of the runtime authorization flow. Never stored, consumed
/// immediately to decide whether acquisition proceeds.
pub enum PermissionDecision {
    Granted,
    Denied,
}

pub trait LocationProvider: Send + Sync {
    /// Ask the platform for "location while in use" authorization. Platforms
    /// without an explicit consent flow report [PermissionDecision::Granted]
    /// without prompting.
    fn request_permission(&self) -> impl Future<Output = Result<PermissionDecision>> + Send;
    /// Request a single current-position fix
    fn current_fix(&self) -> impl Future<Output = Result<Fix>> + Send;
}
