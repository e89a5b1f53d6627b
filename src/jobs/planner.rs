//! Resumption planner: how far back to re-read a symbol's prices

use crate::config::{LookbackMode, LookbackPolicy, SmaWindows};
use crate::error::Result;
use crate::services::market_data::PriceSeriesReader;
use chrono::{Days, NaiveDate};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ResumptionPlanner {
    windows: SmaWindows,
    policy: LookbackPolicy,
}

impl ResumptionPlanner {
    pub fn new(windows: SmaWindows, policy: LookbackPolicy) -> Self {
        Self { windows, policy }
    }

    /// Lookback length in the policy's unit: longest window plus pad
    pub fn lookback(&self) -> u32 {
        self.windows.max().saturating_add(self.policy.pad)
    }

    /// `latest - lookback` calendar days, `None` if that underflows the calendar
    pub fn calendar_floor(&self, latest: NaiveDate) -> Option<NaiveDate> {
        latest.checked_sub_days(Days::new(u64::from(self.lookback())))
    }

    /// Start-date floor for reading `symbol`.
    ///
    /// No recorded event means the whole history is read (`None`).
    pub async fn plan<R>(
        &self,
        reader: &R,
        symbol: &str,
        latest: Option<NaiveDate>,
    ) -> Result<Option<NaiveDate>>
    where
        R: PriceSeriesReader + ?Sized,
    {
        let Some(latest) = latest else {
            debug!(symbol = %symbol, "ResumptionPlanner: no prior events for {}, reading full history", symbol);
            return Ok(None);
        };

        let floor = match self.policy.mode {
            LookbackMode::CalendarDays => self.calendar_floor(latest),
            LookbackMode::Observations => {
                reader
                    .observation_floor(symbol, latest, self.lookback())
                    .await?
            }
        };

        debug!(
            symbol = %symbol,
            latest = %latest,
            floor = ?floor,
            mode = ?self.policy.mode,
            "ResumptionPlanner: resuming {} from {:?}",
            symbol,
            floor
        );
        Ok(floor)
    }
}
