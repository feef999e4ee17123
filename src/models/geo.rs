//! Position samples, office reference and validation results.

use serde::{Deserialize, Serialize};

/// Where a [`GeoPoint`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Reported by the positioning sensor.
    Sampled,
    /// Synthesized from the office reference after every strategy failed.
    Fallback,
}

/// A single position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius in meters.
    pub accuracy_meters: f64,
    pub source: PointSource,
    pub captured_at_epoch_millis: i64,
}

impl GeoPoint {
    /// Sample reported by the sensor.
    pub fn sampled(latitude: f64, longitude: f64, accuracy_meters: f64, captured_at_epoch_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            source: PointSource::Sampled,
            captured_at_epoch_millis,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == PointSource::Fallback
    }
}

/// Fixed reference point check-ins are validated against.
///
/// Built once from configuration and passed into every validation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfficeReference {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: u32,
    /// Samples at least this accurate end acquisition early.
    pub accuracy_tolerance_meters: u32,
}

/// Why a validation passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    WithinStrictRadius,
    WithinAccuracyCompensatedRadius,
    UsingFallback,
    OutsideRadius,
    AcquisitionFailed,
}

/// Outcome of validating a sample against the office reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub distance_meters: u32,
    pub effective_radius_meters: u32,
    pub reason_code: ReasonCode,
}
