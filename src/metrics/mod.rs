//! Prometheus metrics for crossover runs

use crate::error::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::path::Path;

pub struct Metrics {
    registry: Registry,
    pub events_recorded_total: IntCounter,
    pub symbols_processed_total: IntCounter,
    pub symbols_skipped_total: IntCounter,
    pub symbols_failed_total: IntCounter,
    pub symbol_scan_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let events_recorded_total = IntCounter::new(
            "sma_events_recorded_total",
            "New crossover events written to the event store",
        )?;
        let symbols_processed_total = IntCounter::new(
            "sma_symbols_processed_total",
            "Symbols scanned to completion",
        )?;
        let symbols_skipped_total = IntCounter::new(
            "sma_symbols_skipped_total",
            "Symbols skipped because their prices could not be read",
        )?;
        let symbols_failed_total = IntCounter::new(
            "sma_symbols_failed_total",
            "Symbols whose event writes failed part-way",
        )?;
        let symbol_scan_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "sma_symbol_scan_duration_seconds",
                "Time to plan, read and scan one symbol",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;

        registry.register(Box::new(events_recorded_total.clone()))?;
        registry.register(Box::new(symbols_processed_total.clone()))?;
        registry.register(Box::new(symbols_skipped_total.clone()))?;
        registry.register(Box::new(symbols_failed_total.clone()))?;
        registry.register(Box::new(symbol_scan_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            events_recorded_total,
            symbols_processed_total,
            symbols_skipped_total,
            symbols_failed_total,
            symbol_scan_duration_seconds,
        })
    }

    /// Render all metrics in the text exposition format
    pub fn export(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the exposition text to `path` (node_exporter textfile collector)
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.export()?)?;
        Ok(())
    }
}
