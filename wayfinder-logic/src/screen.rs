use std::{sync::Arc, time::Duration};

use log::warn;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::{
    location::{Fix, LocationProvider, PermissionDecision},
    orientation::{OrientationSubscription, RotationSample, RotationSensor},
    prelude::*,
    settings::MapSettings,
    view::{MapUiState, MapViewState},
};

/// Notifies the renderer that published state changed and should be redrawn
pub trait StateUpdateSender: Send + Sync {
    fn send_update(&self);
}

/// The live-map screen controller. Gates acquisition behind the platform
/// permission flow, tracks the current coordinate through [LocationProvider],
/// and rotates the marker from [RotationSensor] samples. The renderer pulls
/// snapshots via [MapScreen::ui_state] after each
/// [StateUpdateSender::send_update].
pub struct MapScreen<L: LocationProvider, S: RotationSensor, U: StateUpdateSender> {
    state: RwLock<MapViewState>,
    settings: MapSettings,
    location: L,
    sensor: S,
    state_updates: U,
    orientation: Mutex<Option<OrientationSubscription>>,
    cancel: CancellationToken,
}

impl<L, S, U> MapScreen<L, S, U>
where
    L: LocationProvider + 'static,
    S: RotationSensor + 'static,
    U: StateUpdateSender + 'static,
{
    pub fn new(settings: MapSettings, location: L, sensor: S, state_updates: U) -> Self {
        Self {
            state: RwLock::new(MapViewState::default()),
            settings,
            location,
            sensor,
            state_updates,
            orientation: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// The screen is coming on-screen: subscribe to the rotation sensor and
    /// kick off the permission/acquisition chain. Orientation tracking runs
    /// regardless of the permission outcome.
    pub async fn on_mount(self: &Arc<Self>) {
        if let Err(why) = self.start_orientation().await {
            warn!("Rotation sensor unavailable: {why:?}");
        }

        let screen = self.clone();
        tokio::spawn(async move {
            screen.acquire_location().await;
        });
    }

    /// The screen is going away: tear down the follow loop and the sensor
    /// subscription. Runs on every unmount path, including when permission was
    /// denied and no fix ever resolved.
    pub async fn on_unmount(&self) {
        self.cancel.cancel();
        self.stop_orientation().await;
    }

    // == LOCATION ==

    async fn acquire_location(self: Arc<Self>) {
        match self.location.request_permission().await {
            Ok(PermissionDecision::Granted) => {
                if self.settings.follow {
                    self.follow_loop().await;
                } else {
                    self.refresh_position().await;
                }
            }
            Ok(PermissionDecision::Denied) => {
                warn!("Location permission not granted, staying on the default region");
            }
            Err(why) => {
                warn!("Location permission error: {why:?}");
            }
        }
    }

    /// Request one fix and publish it. A failed fix keeps the previous
    /// coordinate and never takes the screen down.
    pub async fn refresh_position(&self) {
        match self.location.current_fix().await {
            Ok(fix) => self.apply_fix(fix).await,
            Err(why) => warn!("Error getting current location: {why:?}"),
        }
    }

    /// Keep re-fixing on an interval until the screen unmounts
    async fn follow_loop(&self) {
        let period = Duration::from_secs(self.settings.refresh_interval_seconds.max(1) as u64);
        let mut interval = tokio::time::interval(period);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                _ = interval.tick() => {
                    self.refresh_position().await;
                }
            }
        }
    }

    async fn apply_fix(&self, fix: Fix) {
        let mut state = self.state.write().await;
        state.apply_fix(fix);
        drop(state);
        self.state_updates.send_update();
    }

    // == ORIENTATION ==

    /// Subscribe to the rotation sensor and start consuming samples. First
    /// start wins: starting while already subscribed is a no-op and never
    /// creates a second live subscription.
    pub async fn start_orientation(self: &Arc<Self>) -> Result {
        let mut slot = self.orientation.lock().await;
        if slot.is_some() {
            warn!("Orientation tracking already active");
            return Ok(());
        }

        let mut samples = self
            .sensor
            .subscribe()
            .await
            .context("Failed to subscribe to the rotation sensor")?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let screen = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = token.cancelled() => break,

                    sample = samples.recv() => match sample {
                        Some(sample) => screen.apply_sample(sample).await,
                        // Sensor stream closed, keep the last heading
                        None => break,
                    }
                }
            }
        });

        *slot = Some(OrientationSubscription::new(cancel));
        Ok(())
    }

    /// Idempotent: stopping while already idle is a no-op
    pub async fn stop_orientation(&self) {
        if let Some(subscription) = self.orientation.lock().await.take() {
            subscription.cancel();
        }
    }

    pub async fn orientation_active(&self) -> bool {
        self.orientation.lock().await.is_some()
    }

    async fn apply_sample(&self, sample: RotationSample) {
        let heading = sample.heading_degrees();
        let mut state = self.state.write().await;
        state.apply_heading(heading);
        drop(state);
        self.state_updates.send_update();
    }

    // == RENDERER SNAPSHOTS ==

    pub async fn ui_state(&self) -> MapUiState {
        self.state.read().await.as_ui_state(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        location::Coordinate,
        tests::{CountingSender, MockLocation, MockSensor},
    };
    use tokio::{task::yield_now, test};

    type TestScreen = MapScreen<MockLocation, MockSensor, CountingSender>;

    /// Let the spawned acquisition/orientation tasks run
    async fn settle() {
        for _ in 0..16 {
            yield_now().await;
        }
    }

    async fn mount(
        location: MockLocation,
        settings: MapSettings,
    ) -> (Arc<TestScreen>, MockSensor, CountingSender) {
        let sensor = MockSensor::default();
        let updates = CountingSender::default();
        let screen = Arc::new(MapScreen::new(
            settings,
            location,
            sensor.clone(),
            updates.clone(),
        ));
        screen.on_mount().await;
        settle().await;
        (screen, sensor, updates)
    }

    #[test]
    async fn permission_denied_keeps_sentinel_coordinate() {
        let location = MockLocation::denied();
        let (screen, _sensor, _updates) = mount(location.clone(), Default::default()).await;

        let ui = screen.ui_state().await;
        assert!(ui.region.center.is_unknown());
        assert!(ui.fixed_at.is_none());
        // Acquisition never ran
        assert_eq!(location.fix_count(), 0);
    }

    #[test]
    async fn permission_failure_is_treated_like_denial() {
        let (screen, _sensor, updates) =
            mount(MockLocation::unavailable(), Default::default()).await;

        assert!(screen.ui_state().await.region.center.is_unknown());
        assert_eq!(updates.count(), 0);
    }

    #[test]
    async fn granted_fix_passes_through_exactly() {
        let location = MockLocation::granted_at(36.2721, -115.0110);
        let (screen, _sensor, updates) = mount(location, Default::default()).await;

        let ui = screen.ui_state().await;
        assert_eq!(ui.region.center, Coordinate::new(36.2721, -115.0110));
        assert_eq!(ui.marker.coordinate, ui.region.center);
        assert!(ui.fixed_at.is_some());
        assert_eq!(updates.count(), 1);
    }

    #[test]
    async fn failed_fix_keeps_previous_value() {
        let (screen, _sensor, updates) =
            mount(MockLocation::granted_without_fix(), Default::default()).await;

        assert!(screen.ui_state().await.region.center.is_unknown());
        assert_eq!(updates.count(), 0);
    }

    #[test]
    async fn heading_updates_even_when_permission_is_denied() {
        let (screen, sensor, _updates) = mount(MockLocation::denied(), Default::default()).await;

        sensor.emit(0.0, 1.0).await;
        settle().await;

        let ui = screen.ui_state().await;
        assert!(ui.region.center.is_unknown());
        assert!((ui.marker.heading - 90.0).abs() < 1e-9);
    }

    #[test]
    async fn double_start_keeps_a_single_subscription() {
        let (screen, sensor, updates) = mount(MockLocation::denied(), Default::default()).await;

        screen.start_orientation().await.unwrap();
        assert_eq!(sensor.subscribe_count(), 1);

        let before = updates.count();
        sensor.emit(1.0, 0.0).await;
        settle().await;
        // Exactly one consumer saw the sample
        assert_eq!(updates.count(), before + 1);
    }

    #[test]
    async fn stop_without_start_is_a_noop() {
        let screen: Arc<TestScreen> = Arc::new(MapScreen::new(
            Default::default(),
            MockLocation::denied(),
            MockSensor::default(),
            CountingSender::default(),
        ));

        screen.stop_orientation().await;
        assert!(!screen.orientation_active().await);
    }

    #[test]
    async fn unmount_stops_heading_updates() {
        let (screen, sensor, updates) = mount(MockLocation::denied(), Default::default()).await;

        sensor.emit(0.0, 1.0).await;
        settle().await;
        let heading = screen.ui_state().await.marker.heading;
        assert!((heading - 90.0).abs() < 1e-9);

        screen.on_unmount().await;
        settle().await;

        let count = updates.count();
        sensor.emit(-1.0, 0.0).await;
        sensor.emit(0.0, -1.0).await;
        settle().await;

        // The sensor kept emitting but nothing consumed the samples
        assert_eq!(screen.ui_state().await.marker.heading, heading);
        assert_eq!(updates.count(), count);
    }

    #[test]
    async fn repeated_unmount_is_safe() {
        let (screen, _sensor, _updates) = mount(MockLocation::denied(), Default::default()).await;

        screen.on_unmount().await;
        screen.on_unmount().await;
        assert!(!screen.orientation_active().await);
    }

    #[test(start_paused = true)]
    async fn follow_mode_refreshes_on_an_interval() {
        let settings = MapSettings {
            follow: true,
            refresh_interval_seconds: 5,
            ..Default::default()
        };
        let location = MockLocation::granted_at(1.0, 2.0);
        let (screen, _sensor, _updates) = mount(location.clone(), settings).await;

        tokio::time::sleep(Duration::from_secs(16)).await;
        settle().await;

        assert!(location.fix_count() >= 3);
        assert_eq!(
            screen.ui_state().await.region.center,
            Coordinate::new(1.0, 2.0)
        );

        screen.on_unmount().await;
        settle().await;
        let fixes = location.fix_count();

        tokio::time::sleep(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(location.fix_count(), fixes);
    }
}
