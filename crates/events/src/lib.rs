//! In-process event bus for readings cache invalidation.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`ReadingEvent`]: a single invalidation on one [`InvalidationTopic`].
//!
//! Every successful write to the readings store invalidates all three
//! topics so dashboards and history views pick up the new sample.

pub mod bus;

pub use bus::{EventBus, InvalidationTopic, ReadingEvent};
