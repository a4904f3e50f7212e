mod location;
mod orientation;
mod screen;
mod settings;
mod view;

pub use location::{Coordinate, Fix, LocationProvider, PermissionDecision, UtcDT};
pub use orientation::{RotationSample, RotationSensor, SAMPLE_BUFFER};
pub use screen::{MapScreen, StateUpdateSender};
pub use settings::{CampusOverlay, MapSettings, OverlayBounds};
pub use view::{MapUiState, MapViewState, MarkerState, Region};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
