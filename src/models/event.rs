use crate::error::CrossoverError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PriceCrossShortUp,
    PriceCrossShortDown,
    PriceCrossLongUp,
    PriceCrossLongDown,
    GoldenCross,
    DeathCross,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::PriceCrossShortUp,
        EventType::PriceCrossShortDown,
        EventType::PriceCrossLongUp,
        EventType::PriceCrossLongDown,
        EventType::GoldenCross,
        EventType::DeathCross,
    ];

    /// Name as stored in the `event_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PriceCrossShortUp => "price_cross_short_up",
            EventType::PriceCrossShortDown => "price_cross_short_down",
            EventType::PriceCrossLongUp => "price_cross_long_up",
            EventType::PriceCrossLongDown => "price_cross_long_down",
            EventType::GoldenCross => "golden_cross",
            EventType::DeathCross => "death_cross",
        }
    }

    /// Whether this is an SMA-vs-SMA cross rather than a price cross
    pub fn is_sma_cross(&self) -> bool {
        matches!(self, EventType::GoldenCross | EventType::DeathCross)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CrossoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| CrossoverError::UnknownEventType(s.to_string()))
    }
}

/// Primary key of a recorded event: at most one event of a type per symbol per day
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub symbol: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
}

impl EventKey {
    pub fn new(symbol: impl Into<String>, event_date: NaiveDate, event_type: EventType) -> Self {
        Self {
            symbol: symbol.into(),
            event_date,
            event_type,
        }
    }
}

/// A detected crossover, in the shape persisted to `sma_events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaEvent {
    pub symbol: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub short_window: u32,
    pub long_window: u32,
    pub close_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_sma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_sma: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl SmaEvent {
    pub fn key(&self) -> EventKey {
        EventKey::new(self.symbol.clone(), self.event_date, self.event_type)
    }
}
