//! Attendance aggregation.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::calendar::{Period, WorkingCalendar, compute_working_days};
use super::rules::ReportRules;
use crate::error::{AppError, Result};
use crate::models::{
    AttendanceEvent, AttendanceStatus, Employee, EmployeeAttendanceSummary, Highlights, OrgTotals, PerformanceTier,
    PeriodReport,
};

/// Top performers listed at most.
const TOP_PERFORMERS_LIMIT: usize = 5;

/// Attendance rate below which an employee needs attention.
const NEEDS_ATTENTION_BELOW: f64 = 80.0;

/// Round to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Default)]
struct Tally {
    present: i64,
    late: i64,
    work_hours: f64,
}

/// Roll attendance events up into a report.
///
/// Events for employees not on the roster are ignored. Each employee is
/// expected to have at most one event per day; duplicates are counted as
/// extra present days (see [`find_duplicate_event`]).
pub fn aggregate<'a>(
    events: impl IntoIterator<Item = &'a AttendanceEvent>,
    employees: &[Employee],
    calendar: &WorkingCalendar,
    rules: &ReportRules,
) -> PeriodReport {
    let working_days = calendar.len() as i64;

    // Roster order is kept; repeated IDs collapse onto the first entry
    let mut roster: Vec<&Employee> = Vec::with_capacity(employees.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(employees.len());
    for employee in employees {
        if !index.contains_key(employee.id.as_str()) {
            index.insert(employee.id.as_str(), roster.len());
            roster.push(employee);
        }
    }

    let mut tallies: Vec<Tally> = roster.iter().map(|_| Tally::default()).collect();
    let mut early_leave = 0;
    let mut overtime = 0;
    let mut ignored = 0usize;

    for event in events {
        let Some(&slot) = index.get(event.employee_id.as_str()) else {
            ignored += 1;
            continue;
        };
        let tally = &mut tallies[slot];

        tally.present += 1;
        if event.status == AttendanceStatus::Late {
            tally.late += 1;
        }

        if event.check_in.is_none() {
            continue;
        }
        if let Some(hours) = event.work_hours() {
            tally.work_hours += hours;
        }
        if let Some(hour) = event.check_out_hour() {
            if hour < rules.early_leave_before_hour {
                early_leave += 1;
            }
            if hour >= rules.overtime_from_hour {
                overtime += 1;
            }
        }
    }

    if ignored > 0 {
        debug!("Ignored {ignored} events for employees not on the roster");
    }

    let per_employee: Vec<EmployeeAttendanceSummary> = roster
        .iter()
        .zip(tallies)
        .map(|(employee, tally)| summarize(employee, &tally, working_days))
        .collect();

    let mut org_totals = OrgTotals {
        early_leave,
        overtime,
        ..OrgTotals::default()
    };
    for summary in &per_employee {
        org_totals.on_time += summary.on_time_days();
        org_totals.late += summary.late_days;
        org_totals.absent += summary.absent_days;
    }

    let highlights = highlights(&per_employee);
    let period = calendar.period();

    PeriodReport {
        period_start: period.start,
        period_end: period.end,
        working_days_count: working_days,
        per_employee,
        org_totals,
        highlights,
    }
}

fn summarize(employee: &Employee, tally: &Tally, working_days: i64) -> EmployeeAttendanceSummary {
    let attendance_rate = if working_days == 0 {
        0.0
    } else {
        round_one_decimal(tally.present as f64 / working_days as f64 * 100.0)
    };
    let punctuality_rate = if tally.present == 0 {
        0.0
    } else {
        round_one_decimal((tally.present - tally.late) as f64 / tally.present as f64 * 100.0)
    };

    EmployeeAttendanceSummary {
        employee_id: employee.id.clone(),
        full_name: employee.full_name.clone(),
        department: employee.department.clone(),
        present_days: tally.present,
        late_days: tally.late,
        absent_days: working_days - tally.present,
        total_work_hours: tally.work_hours,
        attendance_rate_percent: attendance_rate,
        punctuality_rate_percent: punctuality_rate,
        performance_tier: PerformanceTier::classify(attendance_rate, punctuality_rate),
    }
}

fn highlights(summaries: &[EmployeeAttendanceSummary]) -> Highlights {
    let mut top: Vec<&EmployeeAttendanceSummary> = summaries
        .iter()
        .filter(|s| s.performance_tier == PerformanceTier::Excellent)
        .collect();
    top.sort_by(|a, b| b.attendance_rate_percent.total_cmp(&a.attendance_rate_percent));

    let mut attention: Vec<&EmployeeAttendanceSummary> = summaries
        .iter()
        .filter(|s| s.attendance_rate_percent < NEEDS_ATTENTION_BELOW)
        .collect();
    attention.sort_by(|a, b| a.attendance_rate_percent.total_cmp(&b.attendance_rate_percent));

    Highlights {
        top_performers: top
            .into_iter()
            .take(TOP_PERFORMERS_LIMIT)
            .map(|s| s.employee_id.clone())
            .collect(),
        needs_attention: attention.into_iter().map(|s| s.employee_id.clone()).collect(),
        perfect_attendance: summaries
            .iter()
            .filter(|s| s.absent_days == 0 && s.late_days == 0)
            .map(|s| s.employee_id.clone())
            .collect(),
    }
}

/// First (employee, date) pair that occurs more than once.
pub fn find_duplicate_event<'a>(events: impl IntoIterator<Item = &'a AttendanceEvent>) -> Option<(&'a str, NaiveDate)> {
    let mut seen: HashSet<(&str, NaiveDate)> = HashSet::new();
    events
        .into_iter()
        .map(|e| (e.employee_id.as_str(), e.date))
        .find(|key| !seen.insert(*key))
}

/// Build the report for a period.
///
/// Only events dated inside the period are counted. With
/// `rules.reject_duplicate_events` a repeated (employee, date) pair fails the
/// report; otherwise it is logged and counted as is.
pub fn generate_report(
    period: Period,
    events: &[AttendanceEvent],
    employees: &[Employee],
    rules: &ReportRules,
) -> Result<PeriodReport> {
    let calendar = compute_working_days(period.start, period.end);
    let in_period: Vec<&AttendanceEvent> = events.iter().filter(|e| period.contains(e.date)).collect();

    info!(
        "Generating report {} to {}: {} working days, {} employees, {} of {} events in period",
        period.start,
        period.end,
        calendar.len(),
        employees.len(),
        in_period.len(),
        events.len()
    );

    if let Some((employee_id, date)) = find_duplicate_event(in_period.iter().copied()) {
        if rules.reject_duplicate_events {
            return Err(AppError::DuplicateEvent {
                employee_id: employee_id.to_string(),
                date,
            });
        }
        warn!("Duplicate attendance event for employee {employee_id} on {date}; absent days may go negative");
    }

    Ok(aggregate(in_period, employees, &calendar, rules))
}
