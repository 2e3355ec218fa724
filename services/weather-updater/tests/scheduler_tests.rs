//! Scheduler passes and job lifecycle, driven on paused time.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::Harness;
use test_utils::sample_entry;
use tokio::time::{sleep, Instant};
use weather_common::WeatherError;
use weather_updater::{Scheduler, WeatherConfig, ERROR_READING_DATA};

const A: &str = "/Building/A";
const B: &str = "/Building/B";
const C: &str = "/Building/C";

// ============================================================================
// Passes
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pass_isolates_failures() {
    let h = Harness::with_entries(&[A, B, C]);
    h.provider.push_conditions(Ok(test_utils::sample_conditions(chrono::Utc::now(), 70.0)));
    h.provider.push_conditions(Err(WeatherError::provider("bad gateway")));

    let scheduler = Scheduler::new(h.engine.clone());
    let summary = scheduler.run_conditions_pass().await;

    assert_eq!(summary.refreshed, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.interrupted);

    let cache = h.engine.cache();
    assert_eq!(cache.last_conditions_error(B).as_deref(), Some(ERROR_READING_DATA));
    assert!(cache.last_conditions(C).is_some());
    assert!(cache.last_conditions_error(C).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_pass_paces_entries() {
    let h = Harness::with_entries(&[A, B, C]);
    let scheduler = Scheduler::new(h.engine.clone());

    let started = Instant::now();
    scheduler.run_forecasts_pass().await;

    // Two pauses between three entries
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    assert_eq!(h.provider.forecast_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_entries_without_points_are_skipped() {
    let mut config = WeatherConfig::default();
    config.add(sample_entry(A)).unwrap();
    config.add(sample_entry(B)).unwrap();
    let h = Harness::with_config(config, &[B]);

    let summary = Scheduler::new(h.engine.clone()).run_conditions_pass().await;

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.refreshed, 1);
    assert_eq!(h.provider.conditions_calls(), 1);
    assert!(h.engine.cache().last_conditions(A).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_missing_station_content_does_not_stop_pass() {
    let h = Harness::with_entries(&[A, B]);
    h.provider.push_forecast(Err(WeatherError::MissingStationContent(
        "station has no coordinates".to_string(),
    )));

    let summary = Scheduler::new(h.engine.clone()).run_forecasts_pass().await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.refreshed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pass_forces_refresh() {
    let h = Harness::with_entries(&[A]);
    let scheduler = Scheduler::new(h.engine.clone());

    scheduler.run_conditions_pass().await;
    scheduler.run_conditions_pass().await;

    assert_eq!(h.provider.conditions_calls(), 2);
}

#[tokio::test]
async fn test_pass_reads_config_file_edits() {
    let h = Harness::with_entries(&[A, B]);
    h.config.update(|_| Ok(())).await.unwrap();

    // Another process drops B from the file
    let mut edited = WeatherConfig::load(h.config_path()).await.unwrap();
    assert!(edited.delete(B));
    edited.save(h.config_path()).await.unwrap();

    let scheduler = Scheduler::new(h.engine.clone()).with_pacing(Duration::ZERO);
    let summary = scheduler.run_conditions_pass().await;

    assert_eq!(summary.refreshed, 1);
    assert_eq!(h.provider.conditions_calls(), 1);
    assert!(h.engine.cache().last_conditions(B).is_none());
    assert!(h.config.entry_for_path(B).await.is_none());
}

#[tokio::test]
async fn test_pass_keeps_config_when_file_is_unreadable() {
    let h = Harness::with_entries(&[A, B]);
    tokio::fs::write(h.config_path(), "version=9\n").await.unwrap();

    let scheduler = Scheduler::new(h.engine.clone()).with_pacing(Duration::ZERO);
    let summary = scheduler.run_conditions_pass().await;

    assert_eq!(summary.refreshed, 2);
    assert_eq!(h.config.snapshot().await.entries().len(), 2);
}

// ============================================================================
// Job lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_jobs_fire_after_initial_delay_and_period() {
    let h = Harness::with_entries(&[A]);
    let scheduler = Scheduler::new(h.engine.clone());
    scheduler.start(Duration::from_secs(30), 15, 60);
    assert!(scheduler.is_running());

    sleep(Duration::from_secs(29)).await;
    assert_eq!(h.provider.conditions_calls(), 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(h.provider.conditions_calls(), 1);
    assert_eq!(h.provider.forecast_calls(), 1);

    sleep(Duration::from_secs(15 * 60)).await;
    assert_eq!(h.provider.conditions_calls(), 2);
    assert_eq!(h.provider.forecast_calls(), 1);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_jobs() {
    let h = Harness::with_entries(&[A]);
    let scheduler = Scheduler::new(h.engine.clone());
    scheduler.start(Duration::from_secs(1), 15, 60);

    sleep(Duration::from_secs(2)).await;
    scheduler.stop();
    assert!(!scheduler.is_running());
    assert_eq!(scheduler.periods(), None);

    sleep(Duration::from_secs(4 * 3600)).await;
    assert_eq!(h.provider.conditions_calls(), 1);
    assert_eq!(h.provider.forecast_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reschedule_waits_one_minute() {
    let h = Harness::with_entries(&[A]);
    let scheduler = Scheduler::new(h.engine.clone());
    scheduler.start(Duration::from_secs(3600), 15, 60);

    scheduler.reschedule(30, 90);
    assert_eq!(scheduler.periods(), Some((30, 90)));

    sleep(Duration::from_secs(59)).await;
    assert_eq!(h.provider.conditions_calls(), 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(h.provider.conditions_calls(), 1);

    // The old one hour delay no longer applies
    sleep(Duration::from_secs(3600)).await;
    assert_eq!(h.provider.conditions_calls(), 3);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_interrupts_pass_at_pause() {
    let h = Harness::with_entries(&[A, B, C]);
    let scheduler = Arc::new(Scheduler::new(h.engine.clone()));
    scheduler.start(Duration::ZERO, 15, 60);

    // First entry done, pass now pausing before the second
    sleep(Duration::from_secs(1)).await;
    assert_eq!(h.provider.conditions_calls(), 1);

    scheduler.stop();
    sleep(Duration::from_secs(60)).await;

    assert_eq!(h.provider.conditions_calls(), 1);
    assert_eq!(h.provider.forecast_calls(), 1);
}
