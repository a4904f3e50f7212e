use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

/// How many samples the consumer may lag behind before the producer starts
/// dropping
pub const SAMPLE_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// One 2-axis angular-rate sample from the rotation sensor
pub struct RotationSample {
    /// Rate around the device's x axis
    pub x: f64,
    /// Rate around the device's y axis
    pub y: f64,
}

impl RotationSample {
    /// Marker rotation in degrees, in (-180, 180]. Raw per-sample arctangent:
    /// no smoothing and no unwrapping, consecutive values can jump across the
    /// ±180° boundary.
    pub fn heading_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

pub trait RotationSensor: Send + Sync {
    /// Begin delivering angular-rate samples over a bounded channel. The
    /// sensor closes the channel when the stream ends.
    fn subscribe(&self) -> impl Future<Output = Result<mpsc::Receiver<RotationSample>>> + Send;
}

/// Handle to a live orientation subscription. Owned by the screen from start
/// until [OrientationSubscription::cancel] at unmount.
pub struct OrientationSubscription {
    cancel: CancellationToken,
}

impl OrientationSubscription {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Stop sample delivery, the consumer task exits on its next poll
    pub(crate) fn cancel(self) {
        self.cancel.cancel();
    }
}
