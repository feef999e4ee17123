//! Period attendance reporting.
//!
//! Builds the working-day calendar for a period and rolls attendance events up
//! into per-employee summaries, organization totals and highlight lists.

mod aggregate;
mod calendar;
mod rules;


pub use aggregate::{aggregate, find_duplicate_event, generate_report, round_one_decimal};
pub use calendar::{Period, WorkingCalendar, compute_working_days, is_working_day};
pub use rules::ReportRules;
