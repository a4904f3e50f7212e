use log::trace;
use tauri::{AppHandle, Manager};
use tokio::sync::{Mutex, mpsc};

use wayfinder_logic::{RotationSample, RotationSensor, SAMPLE_BUFFER, prelude::*};

/// Managed slot the webview's rotation-rate events are funneled through.
/// Subscribing replaces the sender, which closes any previous stream and lets
/// a stale consumer task wind down on its own.
#[derive(Default)]
pub struct RotationFeed {
    tx: Mutex<Option<mpsc::Sender<RotationSample>>>,
}

impl RotationFeed {
    /// Forward one sample. Dropped silently when nothing is subscribed or the
    /// consumer is behind; the sensor stream has no backpressure to offer.
    pub async fn push(&self, sample: RotationSample) {
        let tx = self.tx.lock().await;
        if let Some(tx) = tx.as_ref() {
            if tx.try_send(sample).is_err() {
                trace!("Dropping rotation sample");
            }
        }
    }

    async fn open(&self) -> mpsc::Receiver<RotationSample> {
        let (tx, rx) = mpsc::channel(SAMPLE_BUFFER);
        *self.tx.lock().await = Some(tx);
        rx
    }
}

/// [RotationSensor] over the [RotationFeed] managed by the running app
pub struct WebviewRotationSensor(AppHandle);

impl WebviewRotationSensor {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }
}

impl RotationSensor for WebviewRotationSensor {
    async fn subscribe(&self) -> Result<mpsc::Receiver<RotationSample>> {
        let feed = self.0.state::<RotationFeed>();
        Ok(feed.open().await)
    }
}
