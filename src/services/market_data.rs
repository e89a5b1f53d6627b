//! Price series reader interface

use crate::error::{CrossoverError, Result};
use crate::models::PricePoint;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait PriceSeriesReader: Send + Sync {
    /// Distinct symbols with price history, sorted
    async fn symbols(&self) -> Result<Vec<String>>;

    /// Closes for `symbol` ascending by date, nulls excluded.
    ///
    /// `since` is an inclusive floor; there is no upper bound.
    async fn read(&self, symbol: &str, since: Option<NaiveDate>) -> Result<Vec<PricePoint>>;

    /// Date of the `count`-th valid observation counting back from
    /// `at_or_before` (inclusive). `None` if the history is shorter than that.
    async fn observation_floor(
        &self,
        symbol: &str,
        at_or_before: NaiveDate,
        count: u32,
    ) -> Result<Option<NaiveDate>>;
}

/// Check that dates are strictly increasing, as the reader contract promises
pub fn ensure_ordered(symbol: &str, points: &[PricePoint]) -> Result<()> {
    match points
        .windows(2)
        .find(|pair| pair[1].trade_date <= pair[0].trade_date)
    {
        Some(pair) => Err(CrossoverError::UnorderedSeries {
            symbol: symbol.to_string(),
            date: pair[1].trade_date,
        }),
        None => Ok(()),
    }
}
