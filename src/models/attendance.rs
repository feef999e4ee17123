//! Attendance events and the report types derived from them.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Check-in punctuality as recorded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    OnTime,
    Late,
}

/// One recorded day of attendance for one employee.
///
/// Check times are office-local wall clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub employee_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub check_in: Option<NaiveDateTime>,
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
}

impl AttendanceEvent {
    /// Work duration in hours, if both check times are present and ordered.
    pub fn work_hours(&self) -> Option<f64> {
        let (check_in, check_out) = (self.check_in?, self.check_out?);
        let duration = check_out - check_in;
        if duration.num_seconds() <= 0 {
            return None;
        }
        Some(duration.num_seconds() as f64 / 3600.0)
    }

    /// Hour of day of the check-out, if any.
    pub fn check_out_hour(&self) -> Option<u32> {
        self.check_out.map(|t| t.hour())
    }
}

/// Performance tier derived from attendance and punctuality rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceTier {
    /// Classify by rates in percent, first matching row wins.
    pub fn classify(attendance_rate: f64, punctuality_rate: f64) -> Self {
        if attendance_rate >= 95.0 && punctuality_rate >= 90.0 {
            Self::Excellent
        } else if attendance_rate >= 90.0 && punctuality_rate >= 80.0 {
            Self::VeryGood
        } else if attendance_rate >= 85.0 && punctuality_rate >= 70.0 {
            Self::Good
        } else if attendance_rate >= 80.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Per-employee statistics over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAttendanceSummary {
    pub employee_id: String,
    pub full_name: String,
    pub department: Option<String>,
    pub present_days: i64,
    pub late_days: i64,
    /// Negative only when the input held duplicate events.
    pub absent_days: i64,
    pub total_work_hours: f64,
    pub attendance_rate_percent: f64,
    pub punctuality_rate_percent: f64,
    pub performance_tier: PerformanceTier,
}

impl EmployeeAttendanceSummary {
    pub fn on_time_days(&self) -> i64 {
        self.present_days - self.late_days
    }
}

/// Organization-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgTotals {
    pub on_time: i64,
    pub late: i64,
    pub absent: i64,
    pub early_leave: i64,
    pub overtime: i64,
}

/// Employee IDs singled out in a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    /// Excellent tier, best attendance first, at most five.
    pub top_performers: Vec<String>,
    /// Attendance below 80%, worst first.
    pub needs_attention: Vec<String>,
    /// No absences and no late days.
    pub perfect_attendance: Vec<String>,
}

/// Attendance report for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub working_days_count: i64,
    pub per_employee: Vec<EmployeeAttendanceSummary>,
    pub org_totals: OrgTotals,
    pub highlights: Highlights,
}

impl PeriodReport {
    /// Get summary message.
    pub fn summary(&self) -> String {
        let totals = &self.org_totals;
        format!(
            "{start} to {end}: {days} working days, {employees} employees - On time: {on_time}, Late: {late}, Absent: {absent}, Early leave: {early}, Overtime: {overtime}",
            start = self.period_start,
            end = self.period_end,
            days = self.working_days_count,
            employees = self.per_employee.len(),
            on_time = totals.on_time,
            late = totals.late,
            absent = totals.absent,
            early = totals.early_leave,
            overtime = totals.overtime,
        )
    }

    /// Look up one employee's summary.
    pub fn employee(&self, employee_id: &str) -> Option<&EmployeeAttendanceSummary> {
        self.per_employee.iter().find(|s| s.employee_id == employee_id)
    }
}
