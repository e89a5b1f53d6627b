//! SMA crossover events job
//!
//! Computes SMA crossover events (e.g. 50/200) and price crossovers relative
//! to each SMA for every symbol in the prices table, storing only events not
//! already recorded. Also prints stored events for reporting.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use smacross::config::{self, EngineArgs};
use smacross::core::runtime::CrossoverRuntime;
use smacross::db::PostgresDatabase;
use smacross::jobs::context::JobContext;
use smacross::logging;
use smacross::metrics::Metrics;
use smacross::services::event_store::EventStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sma-events", about = "Detect and record SMA crossover events")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan every symbol and record new events (default)
    Run {
        /// Write Prometheus metrics here when the run finishes
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },
    /// Print stored events for a symbol as JSON lines
    Events {
        #[arg(long)]
        symbol: String,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(&cli.engine.log_level);

    // Fail fast on bad windows before touching the database
    let engine_config = cli.engine.to_config()?;

    info!(environment = %config::get_environment(), "Starting SMA events job");
    let database = Arc::new(PostgresDatabase::connect(&config::get_database_url()).await?);

    match cli.command.unwrap_or(Command::Run { metrics_file: None }) {
        Command::Run { metrics_file } => {
            let metrics = Arc::new(Metrics::new()?);
            let context = JobContext::new(
                database.clone(),
                database.clone(),
                Some(metrics.clone()),
                engine_config,
            )?;
            let runtime = CrossoverRuntime::new(Arc::new(context));
            let summary = runtime.run().await?;

            for report in &summary.reports {
                println!("{}", serde_json::to_string(report)?);
            }

            if let Some(path) = metrics_file {
                metrics.write_to(&path)?;
                info!(path = %path.display(), "Metrics written");
            }

            if !summary.is_complete() {
                return Err(format!(
                    "event writes incomplete for: {}",
                    summary.failed_symbols().join(", ")
                )
                .into());
            }
        }
        Command::Events { symbol, from, to } => {
            let events = database.events_for(&symbol, from, to).await?;
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
            info!(symbol = %symbol, count = events.len(), "Listed stored events");
        }
    }

    Ok(())
}
