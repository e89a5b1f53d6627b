//! SMA events worker
//!
//! Runs the crossover job on a cron schedule until interrupted.
//! Each tick is a full run; symbols that failed are retried on the next one.

use clap::Parser;
use dotenvy::dotenv;
use smacross::config::{self, EngineArgs, DEFAULT_SCHEDULE};
use smacross::core::runtime::CrossoverRuntime;
use smacross::core::scheduler::JobScheduler;
use smacross::db::PostgresDatabase;
use smacross::jobs::context::JobContext;
use smacross::logging;
use smacross::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "worker", about = "Run the SMA events job on a schedule")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Six-field cron expression (sec min hour day month weekday)
    #[arg(long, env = "SMA_SCHEDULE", default_value = DEFAULT_SCHEDULE)]
    schedule: String,

    /// Run once immediately before waiting for the schedule
    #[arg(long)]
    run_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(&cli.engine.log_level);

    let engine_config = cli.engine.to_config()?;

    info!("Starting SMA events worker");
    info!(environment = %config::get_environment(), "Environment");

    info!("Initializing Postgres connection...");
    let database = Arc::new(PostgresDatabase::connect(&config::get_database_url()).await?);
    info!("Postgres connected");

    let metrics = Arc::new(Metrics::new()?);
    let context = JobContext::new(database.clone(), database, Some(metrics), engine_config)?;
    let runtime = Arc::new(CrossoverRuntime::new(Arc::new(context)));

    if cli.run_on_start {
        if let Err(e) = runtime.run().await {
            error!(error = %e, "Initial run aborted");
        }
    }

    let scheduler = JobScheduler::new(runtime, &cli.schedule)?;
    if let Some(next) = scheduler.next_run() {
        info!(next_run = %next, "Next scheduled run");
    }
    scheduler.start().await;

    // Graceful shutdown
    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
