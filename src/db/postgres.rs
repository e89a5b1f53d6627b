//! Postgres operations for prices and SMA events

use crate::config::MAX_CHUNK_SIZE;
use crate::error::{CrossoverError, Result};
use crate::models::{EventKey, EventType, PricePoint, SmaEvent};
use crate::services::event_store::EventStore;
use crate::services::market_data::PriceSeriesReader;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{info, warn};

/// Columns bound per event row in an upsert
pub const EVENT_COLUMNS: usize = 9;

pub struct PostgresDatabase {
    client: Client,
}

impl PostgresDatabase {
    /// Connect (with exponential backoff) and make sure `sma_events` exists
    pub async fn connect(url: &str) -> Result<Self> {
        let (client, connection) = (|| async { tokio_postgres::connect(url, NoTls).await })
            .retry(ExponentialBuilder::default().with_max_times(5))
            .notify(|e: &tokio_postgres::Error, dur: Duration| {
                warn!(error = %e, retry_in = ?dur, "PostgresDatabase: connection attempt failed");
            })
            .await
            .map_err(|e| CrossoverError::Unavailable(format!("failed to connect to Postgres: {}", e)))?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Postgres connection error");
            }
        });

        let db = Self { client };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS sma_events (
                    symbol VARCHAR(32) NOT NULL,
                    event_date DATE NOT NULL,
                    event_type VARCHAR(32) NOT NULL,
                    short_window INTEGER NOT NULL,
                    long_window INTEGER NOT NULL,
                    close_price DOUBLE PRECISION,
                    short_sma DOUBLE PRECISION,
                    long_sma DOUBLE PRECISION,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    PRIMARY KEY (symbol, event_date, event_type)
                );
                ALTER TABLE sma_events ADD COLUMN IF NOT EXISTS close_price DOUBLE PRECISION;",
            )
            .await?;

        info!("PostgresDatabase: sma_events schema ready");
        Ok(())
    }

    fn event_from_row(row: &Row) -> Result<SmaEvent> {
        let event_type: String = row.get(2);
        let close_price: Option<f64> = row.get(5);
        Ok(SmaEvent {
            symbol: row.get(0),
            event_date: row.get(1),
            event_type: event_type.parse()?,
            short_window: window_from_column(row.get(3))?,
            long_window: window_from_column(row.get(4))?,
            close_price: close_price.unwrap_or_default(),
            short_sma: row.get(6),
            long_sma: row.get(7),
            created_at: row.get(8),
        })
    }
}

/// Borrowed view of an event in column order, with SQL-friendly types
struct EventRow<'a> {
    symbol: &'a str,
    event_date: NaiveDate,
    event_type: &'static str,
    short_window: i32,
    long_window: i32,
    close_price: f64,
    short_sma: Option<f64>,
    long_sma: Option<f64>,
    created_at: DateTime<Utc>,
}

impl<'a> TryFrom<&'a SmaEvent> for EventRow<'a> {
    type Error = CrossoverError;

    fn try_from(event: &'a SmaEvent) -> Result<Self> {
        Ok(Self {
            symbol: &event.symbol,
            event_date: event.event_date,
            event_type: event.event_type.as_str(),
            short_window: window_to_column(event.short_window)?,
            long_window: window_to_column(event.long_window)?,
            close_price: event.close_price,
            short_sma: event.short_sma,
            long_sma: event.long_sma,
            created_at: event.created_at,
        })
    }
}

fn window_to_column(window: u32) -> Result<i32> {
    i32::try_from(window).map_err(|_| {
        CrossoverError::Config(format!("window {} does not fit an INTEGER column", window))
    })
}

fn window_from_column(window: i32) -> Result<u32> {
    u32::try_from(window).map_err(|_| {
        CrossoverError::Config(format!("stored window {} is negative", window))
    })
}

/// Multi-row upsert statement for `rows` events.
///
/// Row `n` (zero-based) binds `$(9n + 1)..=$(9n + 9)`. On key conflict only the
/// window, close and SMA columns are replaced; `created_at` keeps its first value.
pub fn upsert_statement(rows: usize) -> String {
    let values: Vec<String> = (0..rows)
        .map(|row| {
            let placeholders: Vec<String> = (1..=EVENT_COLUMNS)
                .map(|col| format!("${}", row * EVENT_COLUMNS + col))
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();

    format!(
        "INSERT INTO sma_events (symbol, event_date, event_type, short_window, long_window,
                                 close_price, short_sma, long_sma, created_at)
         VALUES {}
         ON CONFLICT (symbol, event_date, event_type) DO UPDATE SET
             short_window = EXCLUDED.short_window,
             long_window = EXCLUDED.long_window,
             close_price = EXCLUDED.close_price,
             short_sma = EXCLUDED.short_sma,
             long_sma = EXCLUDED.long_sma",
        values.join(", ")
    )
}

#[async_trait]
impl PriceSeriesReader for PostgresDatabase {
    async fn symbols(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(
                "SELECT DISTINCT symbol FROM prices
                 WHERE symbol IS NOT NULL AND symbol <> ''
                 ORDER BY symbol",
                &[],
            )
            .await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn read(&self, symbol: &str, since: Option<NaiveDate>) -> Result<Vec<PricePoint>> {
        let rows = self
            .client
            .query(
                "SELECT trade_date, close::DOUBLE PRECISION FROM prices
                 WHERE symbol = $1
                   AND close IS NOT NULL
                   AND ($2::DATE IS NULL OR trade_date >= $2)
                 ORDER BY trade_date ASC",
                &[&symbol, &since],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| PricePoint::new(symbol, row.get(0), row.get(1)))
            .collect())
    }

    async fn observation_floor(
        &self,
        symbol: &str,
        at_or_before: NaiveDate,
        count: u32,
    ) -> Result<Option<NaiveDate>> {
        let offset = i64::from(count.saturating_sub(1));
        let row = self
            .client
            .query_opt(
                "SELECT trade_date FROM prices
                 WHERE symbol = $1 AND close IS NOT NULL AND trade_date <= $2
                 ORDER BY trade_date DESC
                 OFFSET $3 LIMIT 1",
                &[&symbol, &at_or_before, &offset],
            )
            .await?;
        Ok(row.map(|row| row.get(0)))
    }
}

#[async_trait]
impl EventStore for PostgresDatabase {
    async fn read_existing_keys(&self) -> Result<Vec<EventKey>> {
        let rows = self
            .client
            .query("SELECT symbol, event_date, event_type FROM sma_events", &[])
            .await?;

        rows.iter()
            .map(|row| {
                let event_type: String = row.get(2);
                Ok(EventKey::new(
                    row.get::<_, String>(0),
                    row.get(1),
                    event_type.parse::<EventType>()?,
                ))
            })
            .collect()
    }

    async fn upsert(&self, batch: &[SmaEvent]) -> Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        if batch.len() > MAX_CHUNK_SIZE {
            return Err(CrossoverError::Config(format!(
                "upsert batch of {} rows exceeds the maximum of {}",
                batch.len(),
                MAX_CHUNK_SIZE
            )));
        }

        let rows = batch
            .iter()
            .map(EventRow::try_from)
            .collect::<Result<Vec<EventRow<'_>>>>()?;
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(rows.len() * EVENT_COLUMNS);
        for row in &rows {
            params.push(&row.symbol);
            params.push(&row.event_date);
            params.push(&row.event_type);
            params.push(&row.short_window);
            params.push(&row.long_window);
            params.push(&row.close_price);
            params.push(&row.short_sma);
            params.push(&row.long_sma);
            params.push(&row.created_at);
        }

        let written = self
            .client
            .execute(&upsert_statement(rows.len()), &params)
            .await?;
        Ok(written)
    }

    async fn events_for(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SmaEvent>> {
        let rows = self
            .client
            .query(
                "SELECT symbol, event_date, event_type, short_window, long_window,
                        close_price, short_sma, long_sma, created_at
                 FROM sma_events
                 WHERE symbol = $1
                   AND ($2::DATE IS NULL OR event_date >= $2)
                   AND ($3::DATE IS NULL OR event_date <= $3)
                 ORDER BY event_date ASC, event_type ASC",
                &[&symbol, &from, &to],
            )
            .await?;

        rows.iter().map(Self::event_from_row).collect()
    }
}
