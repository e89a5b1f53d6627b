//! Crossover scanner: one left-to-right pass, three sign-change registers.
//!
//! - price vs. short SMA -> `price_cross_short_{up,down}`
//! - price vs. long SMA -> `price_cross_long_{up,down}`
//! - short SMA vs. long SMA -> `golden_cross` / `death_cross`
//!
//! A difference of exactly zero never fires by itself but satisfies both
//! sides of the next comparison, so `0 -> positive` is an up-cross and
//! `0 -> negative` a down-cross.

use crate::config::SmaWindows;
use crate::models::{AnnotatedPoint, EventType, SmaEvent};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    Up,
    Down,
}

/// Previous signed difference for one line pair.
///
/// Cleared whenever the difference is undefined so that no cross is ever
/// reported across a gap in average validity.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CrossRegister {
    prev: Option<f64>,
}

impl CrossRegister {
    /// Feed today's difference and report a crossing against yesterday's.
    pub fn step(&mut self, diff: Option<f64>) -> Option<CrossDirection> {
        let Some(diff) = diff else {
            self.prev = None;
            return None;
        };

        let cross = match self.prev {
            Some(prev) if prev <= 0.0 && diff > 0.0 => Some(CrossDirection::Up),
            Some(prev) if prev >= 0.0 && diff < 0.0 => Some(CrossDirection::Down),
            _ => None,
        };
        self.prev = Some(diff);
        cross
    }

    pub fn previous(&self) -> Option<f64> {
        self.prev
    }
}

/// The three registers for one symbol's scan. Built fresh per symbol.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CrossoverState {
    pub short: CrossRegister,
    pub long: CrossRegister,
    pub sma: CrossRegister,
}

impl CrossoverState {
    /// Advance all registers by one point, returning the event types that fire.
    ///
    /// Order is fixed: short price cross, long price cross, SMA cross.
    pub fn step(&mut self, point: &AnnotatedPoint) -> Vec<EventType> {
        let mut fired = Vec::new();

        match self.short.step(point.short_diff()) {
            Some(CrossDirection::Up) => fired.push(EventType::PriceCrossShortUp),
            Some(CrossDirection::Down) => fired.push(EventType::PriceCrossShortDown),
            None => {}
        }
        match self.long.step(point.long_diff()) {
            Some(CrossDirection::Up) => fired.push(EventType::PriceCrossLongUp),
            Some(CrossDirection::Down) => fired.push(EventType::PriceCrossLongDown),
            None => {}
        }
        match self.sma.step(point.sma_diff()) {
            Some(CrossDirection::Up) => fired.push(EventType::GoldenCross),
            Some(CrossDirection::Down) => fired.push(EventType::DeathCross),
            None => {}
        }

        fired
    }
}

pub struct CrossoverScanner {
    windows: SmaWindows,
    detected_at: DateTime<Utc>,
}

impl CrossoverScanner {
    pub fn new(windows: SmaWindows) -> Self {
        Self {
            windows,
            detected_at: Utc::now(),
        }
    }

    /// Pin the `created_at` stamped on emitted events
    pub fn with_detected_at(mut self, detected_at: DateTime<Utc>) -> Self {
        self.detected_at = detected_at;
        self
    }

    /// Scan one symbol's annotated series and return candidate events in date order.
    ///
    /// Candidates are not checked against storage; that is the deduplicator's job.
    pub fn scan(&self, symbol: &str, points: &[AnnotatedPoint]) -> Vec<SmaEvent> {
        let mut state = CrossoverState::default();
        let mut events = Vec::new();

        for point in points {
            for event_type in state.step(point) {
                events.push(SmaEvent {
                    symbol: symbol.to_string(),
                    event_date: point.trade_date,
                    event_type,
                    short_window: self.windows.short(),
                    long_window: self.windows.long(),
                    close_price: point.close,
                    short_sma: point.short_sma,
                    long_sma: point.long_sma,
                    created_at: self.detected_at,
                });
            }
        }

        events
    }
}
