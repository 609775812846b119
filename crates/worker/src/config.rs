//! Scheduler configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use vitalwatch_core::simulator::VitalsSimulator;

/// Default gap between automatic recordings.
pub const DEFAULT_RECORD_INTERVAL: Duration = Duration::from_secs(30);

/// Granularity of the user-facing countdown.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// An environment variable is present but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Read and parse `name`. Missing or blank variables yield `Ok(None)`.
pub fn env_parse<T: FromStr>(name: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    name,
                    expected,
                    value: raw,
                })
        }
        _ => Ok(None),
    }
}

/// Timing and seeding for the autonomous monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub record_interval: Duration,
    pub countdown_tick: Duration,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub simulator_seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            record_interval: DEFAULT_RECORD_INTERVAL,
            countdown_tick: COUNTDOWN_TICK,
            simulator_seed: None,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `MONITOR_INTERVAL_SECS` | `30`    |
    /// | `SIMULATOR_SEED`        | random  |
    pub fn from_env() -> Result<Self, ConfigError> {
        let interval_secs: Option<u64> =
            env_parse("MONITOR_INTERVAL_SECS", "a positive number of seconds")?;
        if interval_secs == Some(0) {
            return Err(ConfigError::Invalid {
                name: "MONITOR_INTERVAL_SECS",
                expected: "a positive number of seconds",
                value: "0".into(),
            });
        }

        Ok(Self {
            record_interval: interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RECORD_INTERVAL),
            countdown_tick: COUNTDOWN_TICK,
            simulator_seed: env_parse("SIMULATOR_SEED", "an unsigned integer")?,
        })
    }

    /// Recording period in whole seconds, as shown by the countdown.
    pub fn period_secs(&self) -> u32 {
        u32::try_from(self.record_interval.as_secs()).unwrap_or(u32::MAX).max(1)
    }

    pub fn build_simulator(&self) -> VitalsSimulator {
        match self.simulator_seed {
            Some(seed) => VitalsSimulator::with_seed(seed),
            None => VitalsSimulator::new(),
        }
    }
}
