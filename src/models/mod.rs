//! Data models for positions, office references, attendance events and reports.

pub mod attendance;
pub mod employee;
pub mod geo;

pub use attendance::{
    AttendanceEvent, AttendanceStatus, EmployeeAttendanceSummary, Highlights, OrgTotals, PerformanceTier,
    PeriodReport,
};
pub use employee::Employee;
pub use geo::{GeoPoint, OfficeReference, PointSource, ReasonCode, ValidationResult};
