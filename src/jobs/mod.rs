//! Per-symbol processing: resumption planning, dedup and persistence

pub mod context;
pub mod dedup;
pub mod handlers;
pub mod planner;
pub mod types;

pub use context::JobContext;
pub use dedup::EventIndex;
pub use planner::ResumptionPlanner;
pub use types::{RunSummary, SymbolOutcome, SymbolReport};
