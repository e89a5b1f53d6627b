//! Shared data models spanning the engine layers.

pub mod event;
pub mod price;

pub use event::{EventKey, EventType, SmaEvent};
pub use price::{AnnotatedPoint, PricePoint};
