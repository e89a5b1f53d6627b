use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close for a symbol, as handed over by the price reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(symbol: impl Into<String>, trade_date: NaiveDate, close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            trade_date,
            close,
        }
    }
}

/// A close annotated with the moving averages valid at that point.
///
/// Lives only for the duration of one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedPoint {
    pub trade_date: NaiveDate,
    pub close: f64,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
}

impl AnnotatedPoint {
    /// `close - short_sma`
    pub fn short_diff(&self) -> Option<f64> {
        self.short_sma.map(|sma| self.close - sma)
    }

    /// `close - long_sma`
    pub fn long_diff(&self) -> Option<f64> {
        self.long_sma.map(|sma| self.close - sma)
    }

    /// `short_sma - long_sma`, absent unless both are valid
    pub fn sma_diff(&self) -> Option<f64> {
        match (self.short_sma, self.long_sma) {
            (Some(short), Some(long)) => Some(short - long),
            _ => None,
        }
    }
}
