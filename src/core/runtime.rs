//! One complete crossover run over every symbol

use crate::error::{CrossoverError, Result};
use crate::jobs::context::JobContext;
use crate::jobs::dedup::EventIndex;
use crate::jobs::handlers;
use crate::jobs::types::{RunSummary, SymbolOutcome};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CrossoverRuntime {
    context: Arc<JobContext>,
}

impl CrossoverRuntime {
    pub fn new(context: Arc<JobContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<JobContext> {
        &self.context
    }

    /// Run the engine once.
    ///
    /// Symbols are processed one after another. A read failure skips the
    /// symbol, a write failure marks it failed, and the run continues either
    /// way. Configuration errors, unreadable symbol/event indexes and broken
    /// series ordering abort the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let ctx = self.context.as_ref();
        ctx.config.validate()?;

        let symbols = ctx.reader.symbols().await?;
        let mut summary = RunSummary::default();
        if symbols.is_empty() {
            warn!("CrossoverRuntime: no symbols found in prices table");
            return Ok(summary);
        }

        let mut index = EventIndex::from_keys(ctx.store.read_existing_keys().await?);

        info!(
            symbols = symbols.len(),
            existing_events = index.len(),
            short_window = ctx.config.windows.short(),
            long_window = ctx.config.windows.long(),
            "CrossoverRuntime: processing {} symbols for SMA and price crossover events (short={}, long={})",
            symbols.len(),
            ctx.config.windows.short(),
            ctx.config.windows.long()
        );

        for symbol in &symbols {
            let outcome = match handlers::process_symbol(ctx, &mut index, symbol).await {
                Ok(0) => SymbolOutcome::UpToDate,
                Ok(events) => SymbolOutcome::Recorded { events },
                Err(CrossoverError::Read { source, .. }) => {
                    warn!(symbol = %symbol, error = %source, "CrossoverRuntime: skipping {}", symbol);
                    SymbolOutcome::Skipped {
                        reason: source.to_string(),
                    }
                }
                Err(CrossoverError::Write { written, source, .. }) => {
                    error!(
                        symbol = %symbol,
                        written = written,
                        error = %source,
                        "CrossoverRuntime: write failed for {} after {} events",
                        symbol,
                        written
                    );
                    SymbolOutcome::Failed {
                        written,
                        reason: source.to_string(),
                    }
                }
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "CrossoverRuntime: aborting run");
                    return Err(e);
                }
            };

            if let Some(ref metrics) = ctx.metrics {
                match &outcome {
                    SymbolOutcome::Recorded { events } => {
                        metrics.symbols_processed_total.inc();
                        metrics.events_recorded_total.inc_by(*events as u64);
                    }
                    SymbolOutcome::UpToDate => metrics.symbols_processed_total.inc(),
                    SymbolOutcome::Skipped { .. } => metrics.symbols_skipped_total.inc(),
                    SymbolOutcome::Failed { written, .. } => {
                        metrics.symbols_failed_total.inc();
                        metrics.events_recorded_total.inc_by(*written as u64);
                    }
                }
            }

            summary.push(symbol, outcome);
        }

        let failed = summary.failed_symbols();
        info!(
            new_events = summary.total_new_events(),
            processed = summary.processed(),
            skipped = summary.skipped(),
            failed = failed.len(),
            "CrossoverRuntime: completed processing, {} new events stored",
            summary.total_new_events()
        );
        if !failed.is_empty() {
            warn!(symbols = ?failed, "CrossoverRuntime: symbols with incomplete writes");
        }

        Ok(summary)
    }
}
