//! Layered position acquisition with fallback.

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::error::{LocationError, Result};
use super::sensor::{PositionSensor, SensorError};
use super::strategy::AcquisitionStrategy;
use super::validator::HIGH_ACCURACY_METERS;
use crate::models::{GeoPoint, OfficeReference, PointSource};

/// Accuracy reported on a synthesized fallback sample.
pub const FALLBACK_ACCURACY_METERS: f64 = 10.0;

/// Synthetic sample located at the office itself.
pub fn fallback_point(office: &OfficeReference) -> GeoPoint {
    GeoPoint {
        latitude: office.latitude,
        longitude: office.longitude,
        accuracy_meters: FALLBACK_ACCURACY_METERS,
        source: PointSource::Fallback,
        captured_at_epoch_millis: Utc::now().timestamp_millis(),
    }
}

/// Acquire a position, never failing.
///
/// Hard failures degrade to the fallback sample just like exhausted strategies.
pub async fn acquire_location<S: PositionSensor>(
    sensor: &S,
    strategies: &[AcquisitionStrategy],
    office: &OfficeReference,
) -> GeoPoint {
    match try_acquire_location(sensor, strategies, office).await {
        Ok(point) => point,
        Err(e) => {
            warn!("Location acquisition failed ({e}), using office fallback");
            fallback_point(office)
        }
    }
}

/// Walk the strategy table in order and return the best sample.
///
/// Stops at the first sample within [`HIGH_ACCURACY_METERS`], or once a sample
/// is within the office accuracy tolerance. Returns the fallback sample when
/// every strategy failed. Errors only when the table is empty or the sensor
/// reports that positioning is unsupported.
pub async fn try_acquire_location<S: PositionSensor>(
    sensor: &S,
    strategies: &[AcquisitionStrategy],
    office: &OfficeReference,
) -> Result<GeoPoint> {
    if strategies.is_empty() {
        return Err(LocationError::NoStrategies);
    }

    let tolerance = f64::from(office.accuracy_tolerance_meters);
    let mut best: Option<GeoPoint> = None;

    for strategy in strategies {
        let request = strategy.request();
        debug!(
            "Trying strategy {} ({:?}, timeout={:?}, max_age={:?})",
            strategy.name, request.accuracy_mode, request.timeout, request.maximum_age
        );

        let outcome = timeout(request.timeout, sensor.read_position(&request))
            .await
            .unwrap_or(Err(SensorError::Timeout));

        let reading = match outcome {
            Ok(reading) if reading.is_plausible() => reading,
            Ok(reading) => {
                warn!("Strategy {} returned an implausible reading: {:?}", strategy.name, reading);
                continue;
            }
            Err(SensorError::Unsupported) => return Err(LocationError::Unsupported),
            Err(e) => {
                debug!("Strategy {} failed: {e}", strategy.name);
                continue;
            }
        };

        let point = GeoPoint::sampled(
            reading.latitude,
            reading.longitude,
            reading.accuracy_meters,
            reading
                .timestamp_millis
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
        );

        if point.accuracy_meters <= HIGH_ACCURACY_METERS {
            debug!("Strategy {} got a {:.0}m fix", strategy.name, point.accuracy_meters);
            return Ok(point);
        }

        if best.is_none_or(|b| point.accuracy_meters < b.accuracy_meters) {
            best = Some(point);
        }

        if point.accuracy_meters <= tolerance {
            debug!(
                "Strategy {} within tolerance ({:.0}m <= {tolerance}m), stopping",
                strategy.name, point.accuracy_meters
            );
            break;
        }
    }

    match best {
        Some(point) => Ok(point),
        None => {
            info!("All {} acquisition strategies failed, using office fallback", strategies.len());
            Ok(fallback_point(office))
        }
    }
}
