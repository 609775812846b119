//! Background side of the vitals monitor.
//!
//! - [`AutonomousMonitor`] records simulated samples on a fixed cadence.
//! - [`LiveFeed`] follows the latest sample and its alerts.
//! - [`MonitorConfig`] carries the cadence and simulator seed.

pub mod config;
pub mod feed;
pub mod monitor;
pub mod signal;

pub use config::{ConfigError, MonitorConfig};
pub use feed::{DashboardSnapshot, LiveFeed};
pub use monitor::AutonomousMonitor;
