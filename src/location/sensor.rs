//! Positioning sensor seam and the sensors shipped with the crate.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use super::strategy::SensorRequest;

/// Raw fix reported by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    /// Capture time; `None` means "now".
    #[serde(default)]
    pub timestamp_millis: Option<i64>,
}

impl SensorReading {
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            timestamp_millis: None,
        }
    }

    /// Coordinates in range and a non-negative finite accuracy.
    pub fn is_plausible(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.accuracy_meters.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.accuracy_meters >= 0.0
    }
}

/// Failure of a single sensor request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out waiting for a position")]
    Timeout,

    /// No positioning capability; not retried.
    #[error("Positioning not supported")]
    Unsupported,
}

/// A source of position fixes.
pub trait PositionSensor {
    /// Issue one acquisition request.
    fn read_position(&self, request: &SensorRequest) -> impl Future<Output = Result<SensorReading, SensorError>> + Send;
}

/// Sensor that always reports the same fix.
#[derive(Debug, Clone, Copy)]
pub struct FixedSensor {
    reading: SensorReading,
}

impl FixedSensor {
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            reading: SensorReading::new(latitude, longitude, accuracy_meters),
        }
    }
}

impl PositionSensor for FixedSensor {
    async fn read_position(&self, _request: &SensorRequest) -> Result<SensorReading, SensorError> {
        Ok(self.reading)
    }
}

/// One scripted reply of a [`ReplaySensor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedOutcome {
    Reading(SensorReading),
    Error(SensorError),
}

/// Sensor that replays a fixed script, one outcome per request.
///
/// Requests past the end of the script fail with `Unavailable`.
#[derive(Debug, Default)]
pub struct ReplaySensor {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    requests: Mutex<Vec<SensorRequest>>,
    delay: Duration,
}

impl ReplaySensor {
    pub fn new(script: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Load a script from a JSON array of outcomes.
    ///
    /// ```json
    /// [{"error": "timeout"}, {"reading": {"latitude": -6.2, "longitude": 106.8, "accuracy_meters": 80}}]
    /// ```
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let script: Vec<ScriptedOutcome> = serde_json::from_str(json)?;
        Ok(Self::new(script))
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<SensorRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PositionSensor for ReplaySensor {
    async fn read_position(&self, request: &SensorRequest) -> Result<SensorReading, SensorError> {
        let next = {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(*request);
            }
            self.script.lock().ok().and_then(|mut script| script.pop_front())
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match next {
            Some(ScriptedOutcome::Reading(reading)) => Ok(reading),
            Some(ScriptedOutcome::Error(e)) => Err(e),
            None => Err(SensorError::Unavailable("script exhausted".to_string())),
        }
    }
}
