//! SMA (Simple Moving Average) indicator

use crate::config::SmaWindows;
use crate::models::{AnnotatedPoint, PricePoint};

/// Rolling simple moving average aligned with `closes`.
///
/// Element `i` is the arithmetic mean of `closes[i + 1 - period..=i]` once
/// `i >= period - 1`, and `None` before that. Each window is summed directly,
/// no running total is carried between windows.
pub fn rolling_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let warmup = closes.len().min(period - 1);
    let mut averages = vec![None; warmup];
    averages.extend(
        closes
            .windows(period)
            .map(|window| Some(window.iter().sum::<f64>() / period as f64)),
    );
    averages
}

/// Attach both moving averages to each price point.
///
/// The two windows are computed independently over the same closes.
pub fn annotate(points: &[PricePoint], windows: &SmaWindows) -> Vec<AnnotatedPoint> {
    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
    let short = rolling_sma(&closes, windows.short() as usize);
    let long = rolling_sma(&closes, windows.long() as usize);

    points
        .iter()
        .zip(short)
        .zip(long)
        .map(|((point, short_sma), long_sma)| AnnotatedPoint {
            trade_date: point.trade_date,
            close: point.close,
            short_sma,
            long_sma,
        })
        .collect()
}
