//! Geo Attendance - geofenced check-in validation and attendance reports.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use geo_attendance as app;
use tracing_appender::non_blocking::WorkerGuard;

use app::config::{AppConfig, ConfigLoadResult, OfficeUpdate};
use app::export::{export_period_report_to_excel, generate_export_filename};
use app::location::{FixedSensor, ReplaySensor, verify_presence};
use app::models::{AttendanceEvent, Employee, ValidationResult};
use app::report::{Period, compute_working_days, generate_report};

/// Geofenced check-in validation and attendance reports.
#[derive(Parser)]
#[command(name = "geo-attendance", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acquire a position and validate it against the office
    Check(CheckArgs),
    /// List working days in a period
    WorkingDays(RangeArgs),
    /// Build the attendance report for a period
    Report(ReportArgs),
    /// Change the office reference (audited)
    SetOffice(SetOfficeArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Latitude of a fixed sensor reading
    #[arg(long, allow_negative_numbers = true, required_unless_present = "samples", requires = "lng")]
    lat: Option<f64>,

    /// Longitude of a fixed sensor reading
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,

    /// Reported accuracy of the fixed reading in meters
    #[arg(long, default_value_t = 10.0)]
    accuracy: f64,

    /// JSON file with scripted sensor outcomes, one per strategy
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    samples: Option<PathBuf>,
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long, value_parser = parse_flexible_date)]
    from: NaiveDate,

    /// Last day of the period, inclusive
    #[arg(long, value_parser = parse_flexible_date)]
    to: NaiveDate,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// JSON array of attendance events
    #[arg(long)]
    events: PathBuf,

    /// JSON array of roster entries
    #[arg(long)]
    employees: PathBuf,

    /// Write the report to an Excel file (a directory gets a generated filename)
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SetOfficeArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Check-in radius in meters
    #[arg(long)]
    radius: Option<u32>,

    /// Accuracy tolerance in meters
    #[arg(long)]
    tolerance: Option<u32>,

    /// Who is making the change (recorded in the audit log)
    #[arg(long)]
    actor: String,
}

/// Parse date from multiple formats: "2000-1-1", "2000/1/1", "2000 1 1", "2000.1.1"
fn parse_flexible_date(input: &str) -> Result<NaiveDate, String> {
    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    let invalid = || format!("invalid date '{input}', expected YYYY-MM-DD");
    if parts.len() != 3 {
        return Err(invalid());
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let day: u32 = parts[2].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let _log_guard = init_logging(cli.log_dir.as_deref())?;

    let config_path = if let Some(path) = &cli.config {
        path.clone()
    } else if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::debug!("Config path: {:?}", config_path);

    let mut config = load_config(&config_path)?;

    // Environment overrides apply at runtime only, never to the saved file
    match cli.command {
        Command::SetOffice(args) => set_office(config, &config_path, args),
        Command::WorkingDays(args) => working_days(args),
        Command::Check(args) => {
            apply_env(&mut config)?;
            check(&config, args)
        }
        Command::Report(args) => {
            apply_env(&mut config)?;
            report(&config, args)
        }
    }
}

fn apply_env(config: &mut AppConfig) -> anyhow::Result<()> {
    config
        .apply_env_overrides()
        .context("Invalid office override in environment")
}

fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "geo-attendance.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded from {}", path.display());
            Ok(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing at {}, using defaults", path.display());
            Ok(AppConfig::default())
        }
        ConfigLoadResult::Invalid(e) => {
            Err(anyhow::Error::new(e).context(format!("Invalid config file {}", path.display())))
        }
    }
}

fn check(config: &AppConfig, args: CheckArgs) -> anyhow::Result<ExitCode> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let office = config.office_reference();
    let strategies = &config.acquisition.strategies;

    let result: ValidationResult = match (&args.samples, args.lat, args.lng) {
        (Some(path), _, _) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let sensor = ReplaySensor::from_json(&json).context("Invalid sensor script")?;
            rt.block_on(verify_presence(&sensor, strategies, &office))
        }
        (None, Some(lat), Some(lng)) => {
            let sensor = FixedSensor::new(lat, lng, args.accuracy);
            rt.block_on(verify_presence(&sensor, strategies, &office))
        }
        _ => anyhow::bail!("either --samples or both --lat and --lng are required"),
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.is_valid {
        tracing::info!("Check-in allowed ({:?})", result.reason_code);
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            "Check-in rejected: {}m from office, allowed {}m",
            result.distance_meters,
            result.effective_radius_meters
        );
        Ok(ExitCode::from(2))
    }
}

fn working_days(args: RangeArgs) -> anyhow::Result<ExitCode> {
    let calendar = compute_working_days(args.from, args.to);
    for day in calendar.iter() {
        println!("{}", day.format("%Y-%m-%d %a"));
    }
    tracing::info!("{} working days from {} to {}", calendar.len(), args.from, args.to);
    Ok(ExitCode::SUCCESS)
}

fn report(config: &AppConfig, args: ReportArgs) -> anyhow::Result<ExitCode> {
    let events: Vec<AttendanceEvent> = read_json(&args.events)?;
    let employees: Vec<Employee> = read_json(&args.employees)?;
    let period = Period::new(args.range.from, args.range.to);

    let report = generate_report(period, &events, &employees, &config.report)?;

    if let Some(target) = &args.xlsx {
        let path = if target.is_dir() {
            target.join(generate_export_filename("attendance_report"))
        } else {
            target.clone()
        };
        export_period_report_to_excel(&report, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Report exported to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
        for s in &report.per_employee {
            println!(
                "{:<12} {:<30} present {:>3} late {:>3} absent {:>3} hours {:>7.2} attendance {:>5.1}% punctuality {:>5.1}% {}",
                s.employee_id,
                s.full_name,
                s.present_days,
                s.late_days,
                s.absent_days,
                s.total_work_hours,
                s.attendance_rate_percent,
                s.punctuality_rate_percent,
                s.performance_tier.label()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn set_office(mut config: AppConfig, path: &Path, args: SetOfficeArgs) -> anyhow::Result<ExitCode> {
    let update = OfficeUpdate {
        latitude: args.lat,
        longitude: args.lng,
        radius_meters: args.radius,
        accuracy_tolerance_meters: args.tolerance,
    };

    let change = config.update_office(update, &args.actor)?;
    config
        .save(path)
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&change)?);
    Ok(ExitCode::SUCCESS)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
