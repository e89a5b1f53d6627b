//! SMA crossover event detection engine.
//!
//! Turns per-symbol daily closing prices into a deduplicated, resumable stream
//! of dated crossover events (price vs. SMA and SMA vs. SMA) and upserts them
//! into a durable event store.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{CrossoverError, Result};
