use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tauri::AppHandle;
use tauri_plugin_geolocation::{GeolocationExt, PositionOptions};

use wayfinder_logic::{Coordinate, Fix, LocationProvider, PermissionDecision, prelude::*};

pub struct TauriLocation(AppHandle);

impl TauriLocation {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }
}

const OPTIONS: PositionOptions = PositionOptions {
    enable_high_accuracy: true,
    timeout: 10000, // Unused in our case, set to default
    maximum_age: 2000,
};

impl LocationProvider for TauriLocation {
    /// Only the mobile build has an explicit consent flow. The desktop branch
    /// reports granted without prompting so acquisition still runs; whether
    /// the original screen intended that asymmetry is unresolved upstream.
    #[cfg(mobile)]
    async fn request_permission(&self) -> Result<PermissionDecision> {
        use tauri::plugin::PermissionState;

        let status = self
            .0
            .geolocation()
            .request_permissions(None)
            .map_err(|why| anyhow!("Location permission error: {why:?}"))?;

        let decision = match status.location {
            PermissionState::Granted => PermissionDecision::Granted,
            _ => PermissionDecision::Denied,
        };
        Ok(decision)
    }

    #[cfg(not(mobile))]
    async fn request_permission(&self) -> Result<PermissionDecision> {
        Ok(PermissionDecision::Granted)
    }

    async fn current_fix(&self) -> Result<Fix> {
        let pos = self
            .0
            .geolocation()
            .get_current_position(Some(OPTIONS))
            .map_err(|why| anyhow!("Failed to get loc: {why:?}"))?;

        let coords = Coordinate::new(pos.coords.latitude, pos.coords.longitude);
        let timestamp =
            DateTime::from_timestamp_millis(pos.timestamp as i64).unwrap_or_else(|| Utc::now());

        Ok(Fix { coords, timestamp })
    }
}
