//! Report classification thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds applied while aggregating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRules {
    /// Check-outs before this hour count as early leave (default: 17).
    #[serde(default = "default_early_leave_before_hour")]
    pub early_leave_before_hour: u32,
    /// Check-outs at or after this hour count as overtime (default: 18).
    #[serde(default = "default_overtime_from_hour")]
    pub overtime_from_hour: u32,
    /// Fail report generation on a second event for the same employee and day.
    #[serde(default)]
    pub reject_duplicate_events: bool,
}

fn default_early_leave_before_hour() -> u32 {
    17
}

fn default_overtime_from_hour() -> u32 {
    18
}

impl Default for ReportRules {
    fn default() -> Self {
        Self {
            early_leave_before_hour: default_early_leave_before_hour(),
            overtime_from_hour: default_overtime_from_hour(),
            reject_duplicate_events: false,
        }
    }
}
