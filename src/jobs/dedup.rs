//! Existing-events index used for deduplication and resume planning

use crate::models::{EventKey, SmaEvent};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Keys already recorded in the store plus the latest event date per symbol.
///
/// Loaded once at the start of a run and kept current as batches commit.
#[derive(Debug, Default, Clone)]
pub struct EventIndex {
    keys: HashSet<EventKey>,
    latest: HashMap<String, NaiveDate>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = EventKey>,
    {
        let mut index = Self::new();
        for key in keys {
            index.insert(key);
        }
        index
    }

    fn insert(&mut self, key: EventKey) {
        self.latest
            .entry(key.symbol.clone())
            .and_modify(|latest| {
                if key.event_date > *latest {
                    *latest = key.event_date;
                }
            })
            .or_insert(key.event_date);
        self.keys.insert(key);
    }

    pub fn contains(&self, key: &EventKey) -> bool {
        self.keys.contains(key)
    }

    pub fn latest_event_date(&self, symbol: &str) -> Option<NaiveDate> {
        self.latest.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop candidates whose key is already recorded
    pub fn retain_new(&self, candidates: Vec<SmaEvent>) -> Vec<SmaEvent> {
        candidates
            .into_iter()
            .filter(|event| !self.contains(&event.key()))
            .collect()
    }

    /// Mark committed events as recorded
    pub fn record(&mut self, committed: &[SmaEvent]) {
        for event in committed {
            self.insert(event.key());
        }
    }
}
