//! Domain logic for the autonomous vitals monitor.
//!
//! Everything in this crate is pure and synchronous: no database access, no
//! timers, no I/O. The `db`, `worker`, and `api` crates wire these pieces
//! to storage and to the clock.
//!
//! - [`vitals`]: vital catalogue and the [`vitals::VitalsSample`] record.
//! - [`simulator`]: bounded random walk producing plausible samples.
//! - [`thresholds`]: tri-state clinical classifier.
//! - [`alert`]: active alert derivation and per-sample dismissals.
//! - [`monitor_state`]: recording scheduler state transitions.
//! - [`entry`]: manual entry validation against physical bounds.

pub mod alert;
pub mod entry;
pub mod error;
pub mod monitor_state;
pub mod simulator;
pub mod thresholds;
pub mod types;
pub mod vitals;
