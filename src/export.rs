//! Excel export functionality.

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::models::PeriodReport;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Export a period report to an Excel file.
///
/// Sheet "Attendance Summary" has one row per employee; sheet "Totals" holds
/// the organization counters and highlight lists.
pub fn export_period_report_to_excel(report: &PeriodReport, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    Ok(())
}

/// Render a period report to in-memory xlsx bytes.
pub fn period_report_to_xlsx_bytes(report: &PeriodReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = build_workbook(report)?;
    workbook.save_to_buffer()
}

fn build_workbook(report: &PeriodReport) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    write_summary_sheet(summary, report)?;

    let totals = workbook.add_worksheet();
    write_totals_sheet(totals, report)?;

    Ok(workbook)
}

fn write_summary_sheet(worksheet: &mut Worksheet, report: &PeriodReport) -> Result<(), XlsxError> {
    worksheet.set_name("Attendance Summary")?;

    let header_format = header_format();
    let hours_format = Format::new().set_num_format("0.00");
    let percent_format = Format::new().set_num_format("0.0");

    // Headers
    let headers = [
        "Employee ID",
        "Full Name",
        "Department",
        "Present",
        "Late",
        "Absent",
        "Work Hours",
        "Attendance %",
        "Punctuality %",
        "Performance",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 15)?; // Employee ID
    worksheet.set_column_width(1, 30)?; // Full Name
    worksheet.set_column_width(2, 25)?; // Department
    worksheet.set_column_width(3, 10)?; // Present
    worksheet.set_column_width(4, 8)?; // Late
    worksheet.set_column_width(5, 8)?; // Absent
    worksheet.set_column_width(6, 12)?; // Work Hours
    worksheet.set_column_width(7, 14)?; // Attendance %
    worksheet.set_column_width(8, 14)?; // Punctuality %
    worksheet.set_column_width(9, 20)?; // Performance

    // Data rows
    for (idx, record) in report.per_employee.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &record.employee_id)?;
        worksheet.write_string(row, 1, &record.full_name)?;
        worksheet.write_string(row, 2, record.department.as_deref().unwrap_or(""))?;
        worksheet.write_number(row, 3, record.present_days as f64)?;
        worksheet.write_number(row, 4, record.late_days as f64)?;
        worksheet.write_number(row, 5, record.absent_days as f64)?;
        worksheet.write_number_with_format(row, 6, record.total_work_hours, &hours_format)?;
        worksheet.write_number_with_format(row, 7, record.attendance_rate_percent, &percent_format)?;
        worksheet.write_number_with_format(row, 8, record.punctuality_rate_percent, &percent_format)?;
        worksheet.write_string(row, 9, record.performance_tier.label())?;
    }

    // Autofilter
    if !report.per_employee.is_empty() {
        let last_row = report.per_employee.len() as u32;
        worksheet.autofilter(0, 0, last_row, 9)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}

fn write_totals_sheet(worksheet: &mut Worksheet, report: &PeriodReport) -> Result<(), XlsxError> {
    worksheet.set_name("Totals")?;

    let header_format = header_format();
    let totals = &report.org_totals;

    worksheet.set_column_width(0, 22)?;
    worksheet.set_column_width(1, 40)?;

    worksheet.write_string_with_format(0, 0, "Metric", &header_format)?;
    worksheet.write_string_with_format(0, 1, "Value", &header_format)?;

    let rows: [(&str, String); 10] = [
        ("Period Start", report.period_start.to_string()),
        ("Period End", report.period_end.to_string()),
        ("Working Days", report.working_days_count.to_string()),
        ("On Time", totals.on_time.to_string()),
        ("Late", totals.late.to_string()),
        ("Absent", totals.absent.to_string()),
        ("Early Leave", totals.early_leave.to_string()),
        ("Overtime", totals.overtime.to_string()),
        ("Top Performers", report.highlights.top_performers.join(", ")),
        ("Needs Attention", report.highlights.needs_attention.join(", ")),
    ];

    for (idx, (label, value)) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, *label)?;
        worksheet.write_string(row, 1, value)?;
    }

    let row = (rows.len() + 1) as u32;
    worksheet.write_string(row, 0, "Perfect Attendance")?;
    worksheet.write_string(row, 1, report.highlights.perfect_attendance.join(", "))?;

    Ok(())
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}
