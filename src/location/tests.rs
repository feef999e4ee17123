//! Acquisition and validation scenarios.

use std::time::Duration;

use super::*;
use crate::models::{GeoPoint, OfficeReference, PointSource, ReasonCode};

const OFFICE_LAT: f64 = -6.2395;
const OFFICE_LNG: f64 = 106.8553;

fn office() -> OfficeReference {
    OfficeReference {
        latitude: OFFICE_LAT,
        longitude: OFFICE_LNG,
        radius_meters: 250,
        accuracy_tolerance_meters: 100,
    }
}

/// Latitude `meters` due north of the office.
fn north_of_office(meters: f64) -> f64 {
    OFFICE_LAT + (meters / EARTH_RADIUS_METERS).to_degrees()
}

fn reading(lat: f64, accuracy: f64) -> ScriptedOutcome {
    ScriptedOutcome::Reading(SensorReading::new(lat, OFFICE_LNG, accuracy))
}

fn fast_table() -> Vec<AcquisitionStrategy> {
    vec![
        AcquisitionStrategy::new("high", AccuracyMode::High, 1_000, 0),
        AcquisitionStrategy::new("low-recent", AccuracyMode::Low, 1_000, 30_000),
        AcquisitionStrategy::new("low-cached", AccuracyMode::Low, 1_000, 300_000),
    ]
}

// --- validate ---

#[test]
fn test_validate_at_office() {
    let point = GeoPoint::sampled(OFFICE_LAT, OFFICE_LNG, 10.0, 0);
    let result = validate(&point, &office());
    assert!(result.is_valid);
    assert_eq!(result.distance_meters, 0);
    assert_eq!(result.reason_code, ReasonCode::WithinStrictRadius);
    assert_eq!(result.effective_radius_meters, 255);
}

#[test]
fn test_validate_outside_radius() {
    let point = GeoPoint::sampled(north_of_office(400.0), OFFICE_LNG, 10.0, 0);
    let result = validate(&point, &office());
    assert!(!result.is_valid);
    assert_eq!(result.distance_meters, 400);
    assert_eq!(result.reason_code, ReasonCode::OutsideRadius);
}

#[test]
fn test_validate_accuracy_compensated() {
    let point = GeoPoint::sampled(north_of_office(300.0), OFFICE_LNG, 120.0, 0);
    let result = validate(&point, &office());
    assert!(result.is_valid);
    assert_eq!(result.distance_meters, 300);
    assert_eq!(result.effective_radius_meters, 310);
    assert_eq!(result.reason_code, ReasonCode::WithinAccuracyCompensatedRadius);
}

#[test]
fn test_validate_no_compensation_for_precise_fix() {
    // 270m with a 50m fix: effective radius is 275 but precise fixes get no widening
    let point = GeoPoint::sampled(north_of_office(270.0), OFFICE_LNG, 50.0, 0);
    let result = validate(&point, &office());
    assert!(!result.is_valid);
    assert_eq!(result.reason_code, ReasonCode::OutsideRadius);
}

#[test]
fn test_validate_beyond_compensated_radius() {
    let point = GeoPoint::sampled(north_of_office(320.0), OFFICE_LNG, 120.0, 0);
    let result = validate(&point, &office());
    assert!(!result.is_valid);
    assert_eq!(result.distance_meters, 320);
}

#[test]
fn test_validate_fallback_always_valid() {
    let tiny = OfficeReference {
        radius_meters: 0,
        ..office()
    };
    let far_fallback = GeoPoint {
        latitude: 40.0,
        longitude: -70.0,
        accuracy_meters: FALLBACK_ACCURACY_METERS,
        source: PointSource::Fallback,
        captured_at_epoch_millis: 0,
    };
    for reference in [office(), tiny] {
        let result = validate(&far_fallback, &reference);
        assert!(result.is_valid);
        assert_eq!(result.reason_code, ReasonCode::UsingFallback);
    }
}

// --- acquisition ---

#[tokio::test]
async fn test_acquire_short_circuits_on_precise_fix() {
    let sensor = ReplaySensor::new([reading(OFFICE_LAT, 20.0), reading(OFFICE_LAT, 5.0)]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.source, PointSource::Sampled);
    assert_eq!(point.accuracy_meters, 20.0);
    assert_eq!(sensor.requests().len(), 1);
}

#[tokio::test]
async fn test_acquire_stops_within_tolerance() {
    let sensor = ReplaySensor::new([reading(OFFICE_LAT, 300.0), reading(OFFICE_LAT, 80.0), reading(OFFICE_LAT, 60.0)]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.accuracy_meters, 80.0);
    assert_eq!(sensor.requests().len(), 2);
}

#[tokio::test]
async fn test_acquire_keeps_best_sample() {
    let sensor = ReplaySensor::new([reading(OFFICE_LAT, 400.0), reading(OFFICE_LAT, 250.0), reading(OFFICE_LAT, 900.0)]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.source, PointSource::Sampled);
    assert_eq!(point.accuracy_meters, 250.0);
    assert_eq!(sensor.requests().len(), 3);
}

#[tokio::test]
async fn test_acquire_ignores_equal_accuracy() {
    let first = SensorReading::new(OFFICE_LAT, OFFICE_LNG, 300.0);
    let second = SensorReading::new(north_of_office(50.0), OFFICE_LNG, 300.0);
    let sensor = ReplaySensor::new([ScriptedOutcome::Reading(first), ScriptedOutcome::Reading(second)]);
    let point = acquire_location(&sensor, &fast_table()[..2], &office()).await;

    assert_eq!(point.latitude, OFFICE_LAT);
}

#[tokio::test]
async fn test_acquire_recovers_after_failures() {
    let sensor = ReplaySensor::new([
        ScriptedOutcome::Error(SensorError::Timeout),
        ScriptedOutcome::Error(SensorError::PermissionDenied),
        reading(north_of_office(30.0), 150.0),
    ]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.source, PointSource::Sampled);
    assert_eq!(point.accuracy_meters, 150.0);
}

#[tokio::test]
async fn test_acquire_falls_back_when_all_fail() {
    let sensor = ReplaySensor::new([
        ScriptedOutcome::Error(SensorError::PermissionDenied),
        ScriptedOutcome::Error(SensorError::Unavailable("no fix".to_string())),
        ScriptedOutcome::Error(SensorError::Timeout),
    ]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.source, PointSource::Fallback);
    assert_eq!(point.latitude, OFFICE_LAT);
    assert_eq!(point.longitude, OFFICE_LNG);
    assert_eq!(point.accuracy_meters, FALLBACK_ACCURACY_METERS);
    assert_eq!(sensor.requests().len(), 3);
}

#[tokio::test]
async fn test_acquire_skips_implausible_reading() {
    let sensor = ReplaySensor::new([
        ScriptedOutcome::Reading(SensorReading::new(f64::NAN, OFFICE_LNG, 5.0)),
        reading(OFFICE_LAT, 30.0),
    ]);
    let point = acquire_location(&sensor, &fast_table(), &office()).await;

    assert_eq!(point.source, PointSource::Sampled);
    assert_eq!(point.accuracy_meters, 30.0);
}

#[tokio::test]
async fn test_acquire_times_out_slow_sensor() {
    let table = vec![AcquisitionStrategy::new("slow", AccuracyMode::High, 20, 0)];
    let sensor = ReplaySensor::new([reading(OFFICE_LAT, 5.0)]).with_delay(Duration::from_millis(500));
    let point = acquire_location(&sensor, &table, &office()).await;

    assert_eq!(point.source, PointSource::Fallback);
}

#[tokio::test]
async fn test_acquire_passes_strategy_parameters() {
    let sensor = ReplaySensor::new([]);
    let table = fast_table();
    acquire_location(&sensor, &table, &office()).await;

    let requests = sensor.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].accuracy_mode, AccuracyMode::High);
    assert_eq!(requests[1].maximum_age, Duration::from_secs(30));
    assert_eq!(requests[2].maximum_age, Duration::from_secs(300));
}

#[tokio::test]
async fn test_try_acquire_empty_table() {
    let sensor = FixedSensor::new(OFFICE_LAT, OFFICE_LNG, 5.0);
    let result = try_acquire_location(&sensor, &[], &office()).await;
    assert_eq!(result, Err(LocationError::NoStrategies));

    let point = acquire_location(&sensor, &[], &office()).await;
    assert!(point.is_fallback());
}

#[tokio::test]
async fn test_try_acquire_unsupported() {
    let sensor = ReplaySensor::new([ScriptedOutcome::Error(SensorError::Unsupported), reading(OFFICE_LAT, 5.0)]);
    let result = try_acquire_location(&sensor, &fast_table(), &office()).await;
    assert_eq!(result, Err(LocationError::Unsupported));
    assert_eq!(sensor.requests().len(), 1);
}

// --- verify_presence ---

#[tokio::test]
async fn test_verify_presence_rejects_far_fix() {
    let sensor = FixedSensor::new(north_of_office(400.0), OFFICE_LNG, 10.0);
    let result = verify_presence(&sensor, &fast_table(), &office()).await;
    assert!(!result.is_valid);
    assert_eq!(result.distance_meters, 400);
}

#[tokio::test]
async fn test_verify_presence_fallback_passes() {
    let sensor = ReplaySensor::new([]);
    let result = verify_presence(&sensor, &fast_table(), &office()).await;
    assert!(result.is_valid);
    assert_eq!(result.reason_code, ReasonCode::UsingFallback);
    assert_eq!(result.distance_meters, 0);
}

#[tokio::test]
async fn test_verify_presence_fails_open() {
    let sensor = ReplaySensor::new([ScriptedOutcome::Error(SensorError::Unsupported)]);
    let result = verify_presence(&sensor, &fast_table(), &office()).await;
    assert!(result.is_valid);
    assert_eq!(result.reason_code, ReasonCode::AcquisitionFailed);
    assert_eq!(result.effective_radius_meters, 250);
}
