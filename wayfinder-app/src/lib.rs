mod location;
mod sensor;
mod state;

use std::sync::Arc;

use log::{LevelFilter, warn};
use tauri::{AppHandle, State};
use tauri_specta::{ErrorHandlingMode, collect_commands, collect_events};
use tokio::sync::RwLock;

use std::result::Result as StdResult;

use wayfinder_logic::{MapSettings, MapUiState, RotationSample};

use crate::{
    location::TauriLocation,
    sensor::{RotationFeed, WebviewRotationSensor},
    state::{AppStateHandle, LiveMapScreen, MapStateUpdate, TauriStateUpdateSender},
};

type Result<T = (), E = String> = StdResult<T, E>;

// == MAP SCREEN COMMANDS ==

#[tauri::command]
#[specta::specta]
/// Bring the live-map screen up: subscribes to the rotation sensor and kicks
/// off the permission/location chain. Mounting while already mounted is a
/// no-op.
async fn mount_map_screen(
    settings: Option<MapSettings>,
    app: AppHandle,
    state: State<'_, AppStateHandle>,
) -> Result {
    let mut slot = state.write().await;
    if slot.is_some() {
        warn!("Map screen already mounted");
        return Ok(());
    }

    let screen = Arc::new(LiveMapScreen::new(
        settings.unwrap_or_default(),
        TauriLocation::new(app.clone()),
        WebviewRotationSensor::new(app.clone()),
        TauriStateUpdateSender::new(&app),
    ));
    screen.on_mount().await;
    *slot = Some(screen);
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// Tear the screen down, cancelling the sensor subscription and the follow
/// loop. Safe to call when nothing is mounted.
async fn unmount_map_screen(state: State<'_, AppStateHandle>) -> Result {
    let screen = state.write().await.take();
    if let Some(screen) = screen {
        screen.on_unmount().await;
    }
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// Get the current renderer snapshot, call after receiving [MapStateUpdate]
async fn get_map_state(state: State<'_, AppStateHandle>) -> Result<MapUiState> {
    let slot = state.read().await;
    let screen = slot.as_ref().ok_or("Map screen not mounted")?;
    Ok(screen.ui_state().await)
}

#[tauri::command]
#[specta::specta]
/// Ask for a fresh position fix outside the follow interval
async fn refresh_position(state: State<'_, AppStateHandle>) -> Result {
    let screen = state
        .read()
        .await
        .as_ref()
        .cloned()
        .ok_or("Map screen not mounted")?;
    screen.refresh_position().await;
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// Forward one device rotation-rate sample from the webview
async fn push_rotation_sample(sample: RotationSample, feed: State<'_, RotationFeed>) -> Result {
    feed.push(sample).await;
    Ok(())
}

pub fn mk_specta() -> tauri_specta::Builder {
    tauri_specta::Builder::<tauri::Wry>::new()
        .error_handling(ErrorHandlingMode::Throw)
        .commands(collect_commands![
            mount_map_screen,
            unmount_map_screen,
            get_map_state,
            refresh_position,
            push_rotation_sample,
        ])
        .events(collect_events![MapStateUpdate])
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let state: AppStateHandle = RwLock::new(None);

    let builder = mk_specta();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(LevelFilter::Debug)
                .build(),
        )
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_geolocation::init())
        .invoke_handler(builder.invoke_handler())
        .manage(state)
        .manage(RotationFeed::default())
        .setup(move |app| {
            builder.mount_events(app);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
