//! Error taxonomy for the crossover engine

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrossoverError>;

#[derive(Debug, Error)]
pub enum CrossoverError {
    /// Bad window sizes, chunk size or missing settings. Fatal before any work starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("unknown event type '{0}'")]
    UnknownEventType(String),

    /// The reader handed back dates out of order. Treated as a programming error.
    #[error("price series for {symbol} is not strictly increasing at {date}")]
    UnorderedSeries { symbol: String, date: NaiveDate },

    /// Reading one symbol failed; the run skips it and moves on.
    #[error("failed to read prices for {symbol}: {source}")]
    Read {
        symbol: String,
        #[source]
        source: Box<CrossoverError>,
    },

    /// A batch write failed. `written` rows were durably committed before it.
    #[error("failed to write events for {symbol} after {written} rows: {source}")]
    Write {
        symbol: String,
        written: usize,
        #[source]
        source: Box<CrossoverError>,
    },

    #[error("invalid schedule: {0}")]
    Schedule(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrossoverError {
    pub fn read(symbol: &str, source: CrossoverError) -> Self {
        CrossoverError::Read {
            symbol: symbol.to_string(),
            source: Box::new(source),
        }
    }

    pub fn write(symbol: &str, written: usize, source: CrossoverError) -> Self {
        CrossoverError::Write {
            symbol: symbol.to_string(),
            written,
            source: Box::new(source),
        }
    }
}
