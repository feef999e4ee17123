//! Ordered sensor acquisition strategies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Positioning accuracy requested from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyMode {
    High,
    Low,
}

/// One row of the acquisition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionStrategy {
    pub name: String,
    pub accuracy_mode: AccuracyMode,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Oldest cached sample the sensor may return, in milliseconds (0 = fresh only).
    #[serde(default)]
    pub maximum_age_ms: u64,
}

/// Parameters handed to the sensor for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRequest {
    pub accuracy_mode: AccuracyMode,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl AcquisitionStrategy {
    pub fn new(name: &str, accuracy_mode: AccuracyMode, timeout_ms: u64, maximum_age_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            accuracy_mode,
            timeout_ms,
            maximum_age_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }

    /// Build the sensor request for this strategy.
    pub fn request(&self) -> SensorRequest {
        SensorRequest {
            accuracy_mode: self.accuracy_mode,
            timeout: self.timeout(),
            maximum_age: self.maximum_age(),
        }
    }
}

/// High accuracy fresh fix, then progressively cheaper cached fixes.
pub fn default_strategies() -> Vec<AcquisitionStrategy> {
    vec![
        AcquisitionStrategy::new("high-accuracy", AccuracyMode::High, 15_000, 0),
        AcquisitionStrategy::new("low-accuracy-recent", AccuracyMode::Low, 10_000, 30_000),
        AcquisitionStrategy::new("low-accuracy-cached", AccuracyMode::Low, 5_000, 300_000),
    ]
}
