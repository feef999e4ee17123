//! Geofenced check-in validation.
//!
//! Acquires a position sample by walking an ordered strategy table, then
//! validates it against the office reference using the Haversine distance
//! with an accuracy-compensated radius.
//!
//! # Example
//!
//! ```ignore
//! use geo_attendance::location::{FixedSensor, verify_presence};
//!
//! let sensor = FixedSensor::new(-6.2395, 106.8553, 12.0);
//! let result = verify_presence(&sensor, &config.acquisition.strategies, &office).await;
//! ```

mod acquire;
mod distance;
mod error;
mod sensor;
mod strategy;
mod validator;

#[cfg(test)]
mod tests;

pub use acquire::{FALLBACK_ACCURACY_METERS, acquire_location, fallback_point, try_acquire_location};
pub use distance::{EARTH_RADIUS_METERS, haversine_meters};
pub use error::{LocationError, Result};
pub use sensor::{FixedSensor, PositionSensor, ReplaySensor, ScriptedOutcome, SensorError, SensorReading};
pub use strategy::{AccuracyMode, AcquisitionStrategy, SensorRequest, default_strategies};
pub use validator::{HIGH_ACCURACY_METERS, validate, verify_presence};
