//! Event store interface and the chunked writer on top of it

use crate::error::{CrossoverError, Result};
use crate::models::{EventKey, SmaEvent};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every recorded (symbol, date, type) key
    async fn read_existing_keys(&self) -> Result<Vec<EventKey>>;

    /// Insert the batch; on key conflict overwrite the numeric columns but
    /// keep `created_at`. Returns the number of rows written.
    async fn upsert(&self, batch: &[SmaEvent]) -> Result<u64>;

    /// Stored events for a symbol within an inclusive date range,
    /// ordered by date then type
    async fn events_for(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SmaEvent>>;
}

/// Splits a symbol's new events into fixed-size upserts.
///
/// Chunks are independent: a failure leaves earlier chunks committed.
#[derive(Debug, Clone, Copy)]
pub struct EventWriter {
    chunk_size: usize,
}

impl EventWriter {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Write all events, returning rows written.
    ///
    /// On failure the error is `CrossoverError::Write` carrying how many of
    /// `events` (a prefix) were committed.
    pub async fn write<S>(&self, store: &S, symbol: &str, events: &[SmaEvent]) -> Result<usize>
    where
        S: EventStore + ?Sized,
    {
        let mut committed = 0;
        let mut written = 0;

        for chunk in events.chunks(self.chunk_size) {
            match store.upsert(chunk).await {
                Ok(rows) => {
                    committed += chunk.len();
                    written += rows as usize;
                    debug!(
                        symbol = %symbol,
                        rows = rows,
                        committed = committed,
                        "EventWriter: committed chunk of {} rows for {}",
                        rows,
                        symbol
                    );
                }
                Err(e) => return Err(CrossoverError::write(symbol, committed, e)),
            }
        }

        Ok(written)
    }
}
