//! Per-symbol pipeline: plan -> read -> annotate -> scan -> dedup -> write

use crate::error::{CrossoverError, Result};
use crate::indicators::trend::annotate;
use crate::jobs::context::JobContext;
use crate::jobs::dedup::EventIndex;
use crate::jobs::planner::ResumptionPlanner;
use crate::services::event_store::EventWriter;
use crate::services::market_data::ensure_ordered;
use crate::signals::crossover::CrossoverScanner;
use std::time::Instant;
use tracing::{debug, info};

/// Process one symbol and return the number of new events written.
///
/// Errors:
/// - `CrossoverError::Read` when planning or reading failed; nothing was written.
/// - `CrossoverError::Write` when a batch failed; committed events are already
///   recorded in `index`.
/// - `CrossoverError::UnorderedSeries` when the reader broke its ordering contract.
pub async fn process_symbol(ctx: &JobContext, index: &mut EventIndex, symbol: &str) -> Result<usize> {
    let start = Instant::now();
    let config = &ctx.config;

    let planner = ResumptionPlanner::new(config.windows, config.lookback);
    let since = planner
        .plan(ctx.reader.as_ref(), symbol, index.latest_event_date(symbol))
        .await
        .map_err(|e| CrossoverError::read(symbol, e))?;

    let points = ctx
        .reader
        .read(symbol, since)
        .await
        .map_err(|e| CrossoverError::read(symbol, e))?;
    ensure_ordered(symbol, &points)?;

    let annotated = annotate(&points, &config.windows);
    let candidates = CrossoverScanner::new(config.windows).scan(symbol, &annotated);
    let candidate_count = candidates.len();
    let new_events = index.retain_new(candidates);

    if let Some(ref metrics) = ctx.metrics {
        metrics
            .symbol_scan_duration_seconds
            .observe(start.elapsed().as_secs_f64());
    }

    debug!(
        symbol = %symbol,
        since = ?since,
        points = points.len(),
        candidates = candidate_count,
        new_events = new_events.len(),
        "process_symbol: scanned {} points for {}",
        points.len(),
        symbol
    );

    if new_events.is_empty() {
        debug!(symbol = %symbol, "process_symbol: no new events detected for {}", symbol);
        return Ok(0);
    }

    let writer = EventWriter::new(config.chunk_size);
    match writer.write(ctx.store.as_ref(), symbol, &new_events).await {
        Ok(written) => {
            index.record(&new_events);
            info!(
                symbol = %symbol,
                new_events = written,
                "process_symbol: recorded {} new SMA-related events for {}",
                written,
                symbol
            );
            Ok(written)
        }
        Err(e) => {
            if let CrossoverError::Write { written, .. } = &e {
                index.record(&new_events[..*written]);
            }
            Err(e)
        }
    }
}
