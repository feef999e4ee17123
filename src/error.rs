//! Error types and handling.

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ConfigError;
use crate::location::LocationError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Location acquisition failed hard (not merely degraded)
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// More than one attendance event for the same employee and day
    #[error("Duplicate attendance event for employee {employee_id} on {date}")]
    DuplicateEvent { employee_id: String, date: NaiveDate },
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;
