//! Physiologically plausible vitals signal simulator.
//!
//! Each vital follows a bounded random walk: a uniform delta in
//! `[-max_drift, +max_drift]`, a gentle pull toward the middle of the allowed
//! range, then a clamp into that range. The walk starts from fixed resting
//! baselines and every generated value stays inside its range, so the
//! simulator alone never produces a critical reading.
//!
//! Exactly one [`VitalsSimulator`] should exist per running monitor; the
//! scheduler owns it and advances it once per recording.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::types::{now_nanos, TimestampNanos};
use crate::vitals::{VitalKey, VitalValues, VitalsSample};

/// Fraction of `max_drift` applied as mean reversion at the range edges.
const MEAN_REVERSION_GAIN: f64 = 0.3;

/// Random-walk parameters for one vital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalProfile {
    /// Resting value the walk starts from.
    pub baseline: f64,
    pub min: f64,
    pub max: f64,
    /// Largest per-step random change in either direction.
    pub max_drift: f64,
}

impl VitalProfile {
    const fn new(baseline: f64, min: f64, max: f64, max_drift: f64) -> Self {
        Self {
            baseline,
            min,
            max,
            max_drift,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Apply one walk step with an already drawn `delta`.
    pub fn step(&self, value: f64, delta: f64) -> f64 {
        let normalized = (value - self.min) / (self.max - self.min);
        let reversion = (0.5 - normalized) * self.max_drift * MEAN_REVERSION_GAIN;
        (value + delta + reversion).clamp(self.min, self.max)
    }
}

/// Simulator parameters for a vital.
pub const fn profile(key: VitalKey) -> VitalProfile {
    match key {
        VitalKey::HeartRate => VitalProfile::new(72.0, 60.0, 100.0, 4.0),
        VitalKey::SystolicBp => VitalProfile::new(115.0, 90.0, 130.0, 5.0),
        VitalKey::DiastolicBp => VitalProfile::new(75.0, 60.0, 85.0, 4.0),
        VitalKey::Spo2 => VitalProfile::new(98.2, 95.0, 100.0, 0.5),
        VitalKey::Temperature => VitalProfile::new(36.7, 36.1, 37.2, 0.15),
        VitalKey::RespiratoryRate => VitalProfile::new(15.0, 12.0, 20.0, 2.0),
    }
}

/// Resting baseline values the simulator is seeded with.
pub fn baseline() -> VitalValues {
    VitalValues::from_fn(|key| profile(key).baseline)
}

// ---------------------------------------------------------------------------
// VitalsSimulator
// ---------------------------------------------------------------------------

/// Stateful generator of simulated vitals samples.
#[derive(Debug)]
pub struct VitalsSimulator {
    current: VitalValues,
    last_timestamp: Option<TimestampNanos>,
    rng: StdRng,
}

impl Default for VitalsSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl VitalsSimulator {
    /// Start at the resting baselines with an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(baseline(), StdRng::from_os_rng())
    }

    /// Start at the resting baselines with a deterministic RNG.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(baseline(), StdRng::seed_from_u64(seed))
    }

    /// Start from explicit values, clamped into each vital's range.
    pub fn from_state(values: VitalValues, seed: u64) -> Self {
        Self::with_rng(values, StdRng::seed_from_u64(seed))
    }

    fn with_rng(values: VitalValues, rng: StdRng) -> Self {
        let current = VitalValues::from_fn(|key| {
            let p = profile(key);
            values.get(key).clamp(p.min, p.max)
        });
        Self {
            current,
            last_timestamp: None,
            rng,
        }
    }

    /// Values of the most recent step (or the seed values before any step).
    pub fn current(&self) -> &VitalValues {
        &self.current
    }

    /// Advance the walk and stamp the result with the current wall-clock time.
    pub fn generate_sample(&mut self) -> VitalsSample {
        self.generate_sample_at(now_nanos())
    }

    /// Advance the walk and stamp the result with `now`.
    ///
    /// Timestamps are strictly increasing across calls: a clock that stalls
    /// or steps backwards yields `previous + 1`.
    pub fn generate_sample_at(&mut self, now: TimestampNanos) -> VitalsSample {
        let previous = self.current;
        let rng = &mut self.rng;
        self.current = VitalValues::from_fn(|key| {
            let p = profile(key);
            let delta = rng.random_range(-p.max_drift..=p.max_drift);
            p.step(previous.get(key), delta)
        });

        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        VitalsSample::new(self.current, timestamp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
