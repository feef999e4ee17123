//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::location::{AcquisitionStrategy, default_strategies};
use crate::models::OfficeReference;
use crate::report::ReportRules;

/// Environment variable overriding the office latitude.
pub const ENV_OFFICE_LATITUDE: &str = "OFFICE_LATITUDE";
/// Environment variable overriding the office longitude.
pub const ENV_OFFICE_LONGITUDE: &str = "OFFICE_LONGITUDE";
/// Environment variable overriding the check-in radius.
pub const ENV_OFFICE_RADIUS: &str = "OFFICE_RADIUS_METERS";
/// Environment variable overriding the accuracy tolerance.
pub const ENV_OFFICE_TOLERANCE: &str = "OFFICE_ACCURACY_TOLERANCE_METERS";

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub office: OfficeConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub report: ReportRules,
}

/// Office reference point check-ins are validated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Check-in radius in meters (default: 250).
    #[serde(default = "default_radius_meters")]
    pub radius_meters: u32,
    /// Fixes at least this accurate stop acquisition early (default: 100).
    #[serde(default = "default_accuracy_tolerance_meters")]
    pub accuracy_tolerance_meters: u32,
}

fn default_radius_meters() -> u32 {
    250
}

fn default_accuracy_tolerance_meters() -> u32 {
    100
}

/// Sensor acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Tried in order until one yields a good enough fix.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<AcquisitionStrategy>,
}

/// Requested change to the office reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfficeUpdate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<u32>,
    pub accuracy_tolerance_meters: Option<u32>,
}

/// Audit record of an applied office change.
#[derive(Debug, Clone, Serialize)]
pub struct OfficeChange {
    pub actor: String,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub before: OfficeReference,
    pub after: OfficeReference,
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "geo-attendance")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Apply office overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply office overrides from a variable lookup, then re-validate.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var::<f64, _>(&lookup, ENV_OFFICE_LATITUDE)? {
            self.office.latitude = value;
        }
        if let Some(value) = parse_var::<f64, _>(&lookup, ENV_OFFICE_LONGITUDE)? {
            self.office.longitude = value;
        }
        if let Some(value) = parse_var::<u32, _>(&lookup, ENV_OFFICE_RADIUS)? {
            self.office.radius_meters = value;
        }
        if let Some(value) = parse_var::<u32, _>(&lookup, ENV_OFFICE_TOLERANCE)? {
            self.office.accuracy_tolerance_meters = value;
        }
        self.validate()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let office = &self.office;
        if !office.latitude.is_finite() || !(-90.0..=90.0).contains(&office.latitude) {
            return Err(ConfigError::Validation(
                "Office latitude must be between -90 and 90".to_string(),
            ));
        }
        if !office.longitude.is_finite() || !(-180.0..=180.0).contains(&office.longitude) {
            return Err(ConfigError::Validation(
                "Office longitude must be between -180 and 180".to_string(),
            ));
        }
        if office.radius_meters == 0 {
            return Err(ConfigError::Validation("Office radius must be greater than 0".to_string()));
        }
        if self.acquisition.strategies.is_empty() {
            return Err(ConfigError::Validation(
                "At least one acquisition strategy is required".to_string(),
            ));
        }
        if let Some(s) = self.acquisition.strategies.iter().find(|s| s.timeout_ms == 0) {
            return Err(ConfigError::Validation(format!(
                "Strategy '{}' timeout must be greater than 0",
                s.name
            )));
        }
        if self.report.early_leave_before_hour > 24 || self.report.overtime_from_hour > 24 {
            return Err(ConfigError::Validation("Report hour thresholds cannot exceed 24".to_string()));
        }
        Ok(())
    }

    /// Office reference used for validation.
    pub fn office_reference(&self) -> OfficeReference {
        self.office.reference()
    }

    /// Replace office values and record who did it.
    ///
    /// The change is validated before it is applied and logged on the `audit`
    /// target. Persisting is left to the caller (see [`AppConfig::save`]).
    pub fn update_office(&mut self, update: OfficeUpdate, actor: &str) -> Result<OfficeChange, ConfigError> {
        if actor.trim().is_empty() {
            return Err(ConfigError::Validation("Office change requires an actor".to_string()));
        }

        let before = self.office_reference();
        let mut candidate = self.clone();
        if let Some(latitude) = update.latitude {
            candidate.office.latitude = latitude;
        }
        if let Some(longitude) = update.longitude {
            candidate.office.longitude = longitude;
        }
        if let Some(radius) = update.radius_meters {
            candidate.office.radius_meters = radius;
        }
        if let Some(tolerance) = update.accuracy_tolerance_meters {
            candidate.office.accuracy_tolerance_meters = tolerance;
        }
        candidate.validate()?;

        self.office = candidate.office;
        let change = OfficeChange {
            actor: actor.to_string(),
            changed_at: chrono::Utc::now(),
            before,
            after: self.office_reference(),
        };

        info!(
            target: "audit",
            actor = %change.actor,
            "Office reference changed from ({}, {}, {}m) to ({}, {}, {}m)",
            before.latitude,
            before.longitude,
            before.radius_meters,
            change.after.latitude,
            change.after.longitude,
            change.after.radius_meters
        );

        Ok(change)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl OfficeConfig {
    pub fn reference(&self) -> OfficeReference {
        OfficeReference {
            latitude: self.latitude,
            longitude: self.longitude,
            radius_meters: self.radius_meters,
            accuracy_tolerance_meters: self.accuracy_tolerance_meters,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Env { name, value: raw }),
    }
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            latitude: -6.2395,
            longitude: 106.8553,
            radius_meters: default_radius_meters(),
            accuracy_tolerance_meters: default_accuracy_tolerance_meters(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }
}
