//! Collaborator interfaces: price reader and event store

pub mod event_store;
pub mod market_data;
pub mod memory;

pub use event_store::{EventStore, EventWriter};
pub use market_data::{ensure_ordered, PriceSeriesReader};
pub use memory::MemoryStore;
