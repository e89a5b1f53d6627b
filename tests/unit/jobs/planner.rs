//! Unit tests for the resumption planner

use chrono::{Datelike, Days, NaiveDate};
use smacross::config::{LookbackMode, LookbackPolicy, SmaWindows};
use smacross::jobs::planner::ResumptionPlanner;
use smacross::services::memory::MemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn planner(mode: LookbackMode) -> ResumptionPlanner {
    ResumptionPlanner::new(
        SmaWindows::new(3, 5).unwrap(),
        LookbackPolicy { pad: 5, mode },
    )
}

/// Weekday-only closes starting on Monday 2024-01-01
async fn weekday_store(days: u64) -> MemoryStore {
    let store = MemoryStore::new();
    let start = date(2024, 1, 1);
    let rows = (0..days)
        .map(|i| start + Days::new(i))
        .filter(|d| d.weekday().number_from_monday() <= 5)
        .map(|d| (d, Some(100.0)));
    store.insert_prices("AAPL", rows).await;
    store
}

#[test]
fn test_lookback_is_longest_window_plus_pad() {
    assert_eq!(planner(LookbackMode::CalendarDays).lookback(), 10);
}

#[test]
fn test_unvalidated_pad_saturates_instead_of_wrapping() {
    let planner = ResumptionPlanner::new(
        SmaWindows::new(3, 5).unwrap(),
        LookbackPolicy {
            pad: u32::MAX,
            mode: LookbackMode::CalendarDays,
        },
    );
    assert_eq!(planner.lookback(), u32::MAX);
    // A floor before the start of the calendar means a full read
    assert_eq!(planner.calendar_floor(date(2024, 1, 5)), None);
}

#[tokio::test]
async fn test_no_prior_event_reads_full_history() {
    let store = MemoryStore::new();
    let floor = planner(LookbackMode::CalendarDays)
        .plan(&store, "AAPL", None)
        .await
        .unwrap();
    assert_eq!(floor, None);
}

#[tokio::test]
async fn test_calendar_floor_subtracts_days() {
    let store = MemoryStore::new();
    let floor = planner(LookbackMode::CalendarDays)
        .plan(&store, "AAPL", Some(date(2024, 3, 15)))
        .await
        .unwrap();
    assert_eq!(floor, Some(date(2024, 3, 5)));
}

#[tokio::test]
async fn test_observation_floor_counts_trading_days() {
    let store = weekday_store(60).await;
    // Friday 2024-02-16; ten weekdays back inclusive is Monday 2024-02-05
    let floor = planner(LookbackMode::Observations)
        .plan(&store, "AAPL", Some(date(2024, 2, 16)))
        .await
        .unwrap();
    assert_eq!(floor, Some(date(2024, 2, 5)));
}

#[tokio::test]
async fn test_observation_floor_with_short_history_reads_everything() {
    let store = weekday_store(7).await;
    let floor = planner(LookbackMode::Observations)
        .plan(&store, "AAPL", Some(date(2024, 1, 5)))
        .await
        .unwrap();
    assert_eq!(floor, None);
}

#[tokio::test]
async fn test_observation_floor_propagates_read_errors() {
    let store = weekday_store(30).await;
    store.fail_reads_for("AAPL").await;
    let result = planner(LookbackMode::Observations)
        .plan(&store, "AAPL", Some(date(2024, 1, 20)))
        .await;
    assert!(result.is_err());
}
