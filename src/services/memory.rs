//! In-memory price reader and event store.
//!
//! Backs tests and local dry runs. Read and write failures can be injected
//! per symbol, and every read/upsert request is recorded for inspection.

use crate::error::{CrossoverError, Result};
use crate::models::{EventKey, PricePoint, SmaEvent};
use crate::services::event_store::EventStore;
use crate::services::market_data::PriceSeriesReader;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Faults {
    failing_reads: HashSet<String>,
    // symbol -> number of chunks accepted before every further upsert fails
    failing_writes: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub symbol: String,
    pub since: Option<NaiveDate>,
}

#[derive(Default)]
pub struct MemoryStore {
    prices: RwLock<BTreeMap<String, BTreeMap<NaiveDate, Option<f64>>>>,
    events: RwLock<BTreeMap<EventKey, SmaEvent>>,
    faults: RwLock<Faults>,
    reads: RwLock<Vec<ReadRequest>>,
    upserts: RwLock<Vec<Vec<EventKey>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) closes for a symbol. `None` models a null close.
    pub async fn insert_prices<I>(&self, symbol: &str, rows: I)
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut prices = self.prices.write().await;
        prices.entry(symbol.to_string()).or_default().extend(rows);
    }

    /// Seed an already-recorded event
    pub async fn insert_event(&self, event: SmaEvent) {
        self.events.write().await.insert(event.key(), event);
    }

    /// All stored events in key order
    pub async fn events(&self) -> Vec<SmaEvent> {
        self.events.read().await.values().cloned().collect()
    }

    pub async fn get_event(&self, key: &EventKey) -> Option<SmaEvent> {
        self.events.read().await.get(key).cloned()
    }

    pub async fn fail_reads_for(&self, symbol: &str) {
        self.faults.write().await.failing_reads.insert(symbol.to_string());
    }

    /// Accept `after_chunks` upserts for `symbol`, then fail the rest
    pub async fn fail_writes_for(&self, symbol: &str, after_chunks: usize) {
        self.faults
            .write()
            .await
            .failing_writes
            .insert(symbol.to_string(), after_chunks);
    }

    pub async fn clear_faults(&self) {
        *self.faults.write().await = Faults::default();
    }

    /// Every `read` call received, in order
    pub async fn read_requests(&self) -> Vec<ReadRequest> {
        self.reads.read().await.clone()
    }

    /// Keys of every accepted upsert batch, in order
    pub async fn upserted_batches(&self) -> Vec<Vec<EventKey>> {
        self.upserts.read().await.clone()
    }
}

#[async_trait]
impl PriceSeriesReader for MemoryStore {
    async fn symbols(&self) -> Result<Vec<String>> {
        let prices = self.prices.read().await;
        Ok(prices
            .keys()
            .filter(|symbol| !symbol.is_empty())
            .cloned()
            .collect())
    }

    async fn read(&self, symbol: &str, since: Option<NaiveDate>) -> Result<Vec<PricePoint>> {
        self.reads.write().await.push(ReadRequest {
            symbol: symbol.to_string(),
            since,
        });

        if self.faults.read().await.failing_reads.contains(symbol) {
            return Err(CrossoverError::Unavailable(format!(
                "injected read failure for {}",
                symbol
            )));
        }

        let prices = self.prices.read().await;
        let Some(series) = prices.get(symbol) else {
            return Ok(Vec::new());
        };

        let floor = since.unwrap_or(NaiveDate::MIN);
        Ok(series
            .range(floor..)
            .filter_map(|(date, close)| close.map(|c| PricePoint::new(symbol, *date, c)))
            .collect())
    }

    async fn observation_floor(
        &self,
        symbol: &str,
        at_or_before: NaiveDate,
        count: u32,
    ) -> Result<Option<NaiveDate>> {
        if self.faults.read().await.failing_reads.contains(symbol) {
            return Err(CrossoverError::Unavailable(format!(
                "injected read failure for {}",
                symbol
            )));
        }

        let prices = self.prices.read().await;
        let Some(series) = prices.get(symbol) else {
            return Ok(None);
        };

        Ok(series
            .range(..=at_or_before)
            .rev()
            .filter(|(_, close)| close.is_some())
            .nth(count.saturating_sub(1) as usize)
            .map(|(date, _)| *date))
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn read_existing_keys(&self) -> Result<Vec<EventKey>> {
        Ok(self.events.read().await.keys().cloned().collect())
    }

    async fn upsert(&self, batch: &[SmaEvent]) -> Result<u64> {
        if let Some(first) = batch.first() {
            let mut faults = self.faults.write().await;
            if let Some(remaining) = faults.failing_writes.get_mut(&first.symbol) {
                if *remaining == 0 {
                    return Err(CrossoverError::Unavailable(format!(
                        "injected write failure for {}",
                        first.symbol
                    )));
                }
                *remaining -= 1;
            }
        }

        let mut events = self.events.write().await;
        for event in batch {
            match events.get_mut(&event.key()) {
                Some(existing) => {
                    existing.short_window = event.short_window;
                    existing.long_window = event.long_window;
                    existing.close_price = event.close_price;
                    existing.short_sma = event.short_sma;
                    existing.long_sma = event.long_sma;
                }
                None => {
                    events.insert(event.key(), event.clone());
                }
            }
        }

        self.upserts
            .write()
            .await
            .push(batch.iter().map(SmaEvent::key).collect());
        Ok(batch.len() as u64)
    }

    async fn events_for(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SmaEvent>> {
        let events = self.events.read().await;
        let mut matching: Vec<SmaEvent> = events
            .values()
            .filter(|event| event.symbol == symbol)
            .filter(|event| from.map_or(true, |from| event.event_date >= from))
            .filter(|event| to.map_or(true, |to| event.event_date <= to))
            .cloned()
            .collect();
        // Same order as the SQL store: date, then stored type name
        matching.sort_by(|a, b| {
            a.event_date
                .cmp(&b.event_date)
                .then_with(|| a.event_type.as_str().cmp(b.event_type.as_str()))
        });
        Ok(matching)
    }
}
