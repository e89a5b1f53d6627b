//! Job context for dependency injection

use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::services::event_store::EventStore;
use crate::services::market_data::PriceSeriesReader;
use std::sync::Arc;

/// Collaborators and options shared by every symbol in a run.
///
/// Holds no per-run mutable state; the existing-events index is owned by
/// the run itself and passed to handlers explicitly.
pub struct JobContext {
    pub reader: Arc<dyn PriceSeriesReader>,
    pub store: Arc<dyn EventStore>,
    pub metrics: Option<Arc<Metrics>>,
    pub config: EngineConfig,
}

impl JobContext {
    /// Build a context, rejecting invalid configuration up front
    pub fn new(
        reader: Arc<dyn PriceSeriesReader>,
        store: Arc<dyn EventStore>,
        metrics: Option<Arc<Metrics>>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader,
            store,
            metrics,
            config,
        })
    }
}
