//! Cron-based scheduler for recurring crossover runs

use crate::core::runtime::CrossoverRuntime;
use crate::error::{CrossoverError, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Scheduler that runs the whole engine on every cron tick.
///
/// Each tick is an independent run that reloads the existing-events index.
pub struct JobScheduler {
    runtime: Arc<CrossoverRuntime>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl JobScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `runtime` - Engine to run on each tick
    /// * `cron_expr` - Six-field cron expression (second minute hour day month weekday)
    pub fn new(runtime: Arc<CrossoverRuntime>, cron_expr: &str) -> Result<Self> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            CrossoverError::Schedule(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(cron = %cron_expr, "JobScheduler: created with cron '{}'", cron_expr);

        Ok(Self {
            runtime,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Next time the scheduler will fire
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.schedule.upcoming(Utc).next()
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("JobScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(Utc).next() else {
                    // No more scheduled times, wait a bit and check again
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };

                let now = Utc::now();
                if next_tick > now {
                    let duration = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                info!(tick = %next_tick, "JobScheduler: cron tick, starting run");
                match runtime.run().await {
                    Ok(summary) => info!(
                        new_events = summary.total_new_events(),
                        processed = summary.processed(),
                        skipped = summary.skipped(),
                        failed = summary.failed_symbols().len(),
                        "JobScheduler: run finished"
                    ),
                    Err(e) => error!(error = %e, "JobScheduler: run aborted"),
                }
            }
        });

        *self.handle.write().await = Some(handle);
        info!("JobScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
