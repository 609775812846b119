//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is designed to be shared via `Arc<EventBus>` between the
//! recording scheduler, the manual-entry handler, and any consumers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vitalwatch_core::types::TimestampNanos;

// ---------------------------------------------------------------------------
// InvalidationTopic
// ---------------------------------------------------------------------------

/// Logical views over the readings store that go stale after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    #[serde(rename = "latestReading")]
    LatestReading,
    #[serde(rename = "allReadings")]
    AllReadings,
    #[serde(rename = "readingsByDateRange")]
    ReadingsInRange,
}

impl InvalidationTopic {
    pub const ALL: [InvalidationTopic; 3] = [
        InvalidationTopic::LatestReading,
        InvalidationTopic::AllReadings,
        InvalidationTopic::ReadingsInRange,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            InvalidationTopic::LatestReading => "latestReading",
            InvalidationTopic::AllReadings => "allReadings",
            InvalidationTopic::ReadingsInRange => "readingsByDateRange",
        }
    }
}

impl fmt::Display for InvalidationTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReadingEvent
// ---------------------------------------------------------------------------

/// One topic invalidated by a store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingEvent {
    pub topic: InvalidationTopic,

    /// Timestamp of the sample whose write caused the invalidation.
    pub sample_timestamp: Option<TimestampNanos>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ReadingEvent {
    pub fn new(topic: InvalidationTopic) -> Self {
        Self {
            topic,
            sample_timestamp: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the sample that triggered the event.
    pub fn with_sample(mut self, sample_timestamp: TimestampNanos) -> Self {
        self.sample_timestamp = Some(sample_timestamp);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use vitalwatch_events::bus::{EventBus, InvalidationTopic, ReadingEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ReadingEvent::new(InvalidationTopic::LatestReading));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ReadingEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Events published with no active subscribers are dropped.
    pub fn publish(&self, event: ReadingEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Invalidate every readings topic after a write of `sample_timestamp`.
    pub fn invalidate_readings(&self, sample_timestamp: TimestampNanos) {
        for topic in InvalidationTopic::ALL {
            self.publish(ReadingEvent::new(topic).with_sample(sample_timestamp));
        }
        tracing::debug!(
            sample_timestamp,
            subscribers = self.sender.receiver_count(),
            "Readings invalidated"
        );
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ReadingEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
