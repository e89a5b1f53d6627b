//! Unit tests for SMA indicator

use chrono::{Days, NaiveDate};
use smacross::config::SmaWindows;
use smacross::indicators::trend::{annotate, rolling_sma};
use smacross::models::PricePoint;

fn create_test_points(closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new("TEST", start + Days::new(i as u64), close))
        .collect()
}

#[test]
fn test_sma_absent_before_window_fills() {
    let averages = rolling_sma(&[1.0, 2.0, 3.0, 4.0], 3);
    assert_eq!(averages.len(), 4);
    assert_eq!(averages[0], None);
    assert_eq!(averages[1], None);
    assert_eq!(averages[2], Some(2.0));
    assert_eq!(averages[3], Some(3.0));
}

#[test]
fn test_sma_insufficient_data() {
    let averages = rolling_sma(&[1.0, 2.0], 5);
    assert_eq!(averages, vec![None, None]);
}

#[test]
fn test_sma_empty_input() {
    assert!(rolling_sma(&[], 3).is_empty());
}

#[test]
fn test_sma_zero_period_is_never_defined() {
    assert_eq!(rolling_sma(&[1.0, 2.0], 0), vec![None, None]);
}

#[test]
fn test_sma_matches_naive_mean() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0).collect();
    let period = 7;
    let averages = rolling_sma(&closes, period);

    for (i, average) in averages.iter().enumerate() {
        if i + 1 < period {
            assert!(average.is_none());
        } else {
            let window = &closes[i + 1 - period..=i];
            let expected = window.iter().sum::<f64>() / period as f64;
            assert_eq!(*average, Some(expected));
        }
    }
}

#[test]
fn test_annotate_computes_windows_independently() {
    let points = create_test_points(&[10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 14.0]);
    let windows = SmaWindows::new(3, 5).unwrap();
    let annotated = annotate(&points, &windows);

    assert_eq!(annotated.len(), 7);
    assert_eq!(annotated[1].short_sma, None);
    assert_eq!(annotated[2].short_sma, Some(10.0));
    assert_eq!(annotated[3].long_sma, None);
    assert_eq!(annotated[4].long_sma, Some(10.0));
    assert_eq!(annotated[6].short_sma, Some(12.0));
    assert_eq!(annotated[6].trade_date, points[6].trade_date);
    assert_eq!(annotated[6].close, 14.0);
}

#[test]
fn test_annotated_differences() {
    let points = create_test_points(&[10.0, 10.0, 10.0, 10.0, 10.0, 12.0]);
    let windows = SmaWindows::new(3, 5).unwrap();
    let annotated = annotate(&points, &windows);

    assert_eq!(annotated[2].short_diff(), Some(0.0));
    assert_eq!(annotated[2].long_diff(), None);
    assert_eq!(annotated[2].sma_diff(), None);
    assert_eq!(annotated[4].sma_diff(), Some(0.0));
    assert!(annotated[5].long_diff().unwrap() > 0.0);
}
