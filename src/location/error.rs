//! Location acquisition error types.

use thiserror::Error;

/// Hard acquisition failures.
///
/// Ordinary sensor failures (timeout, denied permission) never surface here;
/// they degrade to the fallback sample instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The strategy table is empty.
    #[error("No acquisition strategies configured")]
    NoStrategies,

    /// The device has no positioning capability at all.
    #[error("Positioning is not supported on this device")]
    Unsupported,
}

/// Result type for location acquisition.
pub type Result<T> = std::result::Result<T, LocationError>;
