//! Distance check against the office reference.

use tracing::{debug, warn};

use super::acquire::try_acquire_location;
use super::distance::haversine_meters;
use super::sensor::PositionSensor;
use super::strategy::AcquisitionStrategy;
use crate::models::{GeoPoint, OfficeReference, ReasonCode, ValidationResult};

/// Fixes at least this accurate are trusted without compensation.
pub const HIGH_ACCURACY_METERS: f64 = 50.0;

/// Validate a sample against the office reference.
///
/// The radius is widened by half the reported accuracy, but only for
/// imprecise fixes (accuracy above [`HIGH_ACCURACY_METERS`]). Fallback
/// samples always pass.
pub fn validate(point: &GeoPoint, reference: &OfficeReference) -> ValidationResult {
    let distance = haversine_meters(point.latitude, point.longitude, reference.latitude, reference.longitude);
    let radius = f64::from(reference.radius_meters);
    let effective_radius = radius + 0.5 * point.accuracy_meters;

    let (is_valid, reason_code) = if point.is_fallback() {
        (true, ReasonCode::UsingFallback)
    } else if distance <= radius {
        (true, ReasonCode::WithinStrictRadius)
    } else if distance <= effective_radius && point.accuracy_meters > HIGH_ACCURACY_METERS {
        (true, ReasonCode::WithinAccuracyCompensatedRadius)
    } else {
        (false, ReasonCode::OutsideRadius)
    };

    debug!(
        "Validated point: distance={distance:.1}m radius={radius}m effective={effective_radius:.1}m -> {reason_code:?}"
    );

    ValidationResult {
        is_valid,
        distance_meters: to_whole_meters(distance),
        effective_radius_meters: to_whole_meters(effective_radius),
        reason_code,
    }
}

/// Acquire a position and validate it.
///
/// A hard acquisition failure does not block the check-in: the result is
/// valid with [`ReasonCode::AcquisitionFailed`].
pub async fn verify_presence<S: PositionSensor>(
    sensor: &S,
    strategies: &[AcquisitionStrategy],
    reference: &OfficeReference,
) -> ValidationResult {
    match try_acquire_location(sensor, strategies, reference).await {
        Ok(point) => validate(&point, reference),
        Err(e) => {
            warn!("Location acquisition failed ({e}), allowing check-in");
            ValidationResult {
                is_valid: true,
                distance_meters: 0,
                effective_radius_meters: reference.radius_meters,
                reason_code: ReasonCode::AcquisitionFailed,
            }
        }
    }
}

fn to_whole_meters(meters: f64) -> u32 {
    meters.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
