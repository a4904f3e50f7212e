use std::sync::Arc;

use log::error;
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_specta::Event;
use tokio::sync::RwLock;

use wayfinder_logic::{MapScreen, StateUpdateSender};

use crate::{location::TauriLocation, sensor::WebviewRotationSensor};

/// The published map state (coordinate or heading) has changed
#[derive(Serialize, Deserialize, Clone, Default, Debug, specta::Type, tauri_specta::Event)]
pub struct MapStateUpdate;

/// Emits [MapStateUpdate] to the webview whenever a tracker publishes
pub struct TauriStateUpdateSender(AppHandle);

impl TauriStateUpdateSender {
    pub fn new(app: &AppHandle) -> Self {
        Self(app.clone())
    }
}

impl StateUpdateSender for TauriStateUpdateSender {
    fn send_update(&self) {
        if let Err(why) = MapStateUpdate.emit(&self.0) {
            error!("Error sending map state update to UI: {why:?}");
        }
    }
}

pub type LiveMapScreen = MapScreen<TauriLocation, WebviewRotationSensor, TauriStateUpdateSender>;

/// Holds the screen while it is mounted
pub type AppStateHandle = RwLock<Option<Arc<LiveMapScreen>>>;
