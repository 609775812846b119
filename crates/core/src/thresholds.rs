//! Tri-state clinical threshold classifier.
//!
//! Pure logic. Each vital has a closed normal interval and optional warning
//! bands directly outside it; anything else is critical. Boundary values
//! belong to the tighter band, so `60 bpm` is normal and `50 bpm` is warning.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::alert::AlertLevel;
use crate::vitals::{VitalKey, VitalsSample};

/// Clinical severity of a single vital value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// The alert level this severity raises, if any.
    pub fn alert_level(self) -> Option<AlertLevel> {
        match self {
            Severity::Normal => None,
            Severity::Warning => Some(AlertLevel::Warning),
            Severity::Critical => Some(AlertLevel::Critical),
        }
    }
}

/// Severity per vital for one sample. Always contains all six keys.
pub type StatusMap = BTreeMap<VitalKey, Severity>;

/// Normal and warning bands for one vital.
///
/// - normal: `[normal_low, normal_high]`
/// - low warning: `[warning_low, normal_low)` when `warning_low` is set
/// - high warning: `(normal_high, warning_high]` when `warning_high` is set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationBand {
    pub normal_low: f64,
    pub normal_high: f64,
    pub warning_low: Option<f64>,
    pub warning_high: Option<f64>,
}

impl ClassificationBand {
    const fn two_sided(normal_low: f64, normal_high: f64, warning_low: f64, warning_high: f64) -> Self {
        Self {
            normal_low,
            normal_high,
            warning_low: Some(warning_low),
            warning_high: Some(warning_high),
        }
    }

    /// Classify a value. NaN fails every comparison and lands in critical.
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.normal_low && value <= self.normal_high {
            return Severity::Normal;
        }
        if let Some(low) = self.warning_low {
            if value >= low && value < self.normal_low {
                return Severity::Warning;
            }
        }
        if let Some(high) = self.warning_high {
            if value > self.normal_high && value <= high {
                return Severity::Warning;
            }
        }
        Severity::Critical
    }
}

/// Static clinical bands for a vital.
pub const fn band(key: VitalKey) -> ClassificationBand {
    match key {
        VitalKey::HeartRate => ClassificationBand::two_sided(60.0, 100.0, 50.0, 120.0),
        VitalKey::SystolicBp => ClassificationBand::two_sided(90.0, 120.0, 80.0, 140.0),
        VitalKey::DiastolicBp => ClassificationBand::two_sided(60.0, 80.0, 50.0, 90.0),
        // One-sided: anything at or above 95% is normal.
        VitalKey::Spo2 => ClassificationBand {
            normal_low: 95.0,
            normal_high: f64::INFINITY,
            warning_low: Some(90.0),
            warning_high: None,
        },
        VitalKey::Temperature => ClassificationBand::two_sided(36.1, 37.2, 35.5, 38.3),
        VitalKey::RespiratoryRate => ClassificationBand::two_sided(12.0, 20.0, 10.0, 25.0),
    }
}

/// Classify a single vital value.
pub fn classify(key: VitalKey, value: f64) -> Severity {
    band(key).classify(value)
}

/// Classify every vital of a sample.
pub fn evaluate_sample(sample: &VitalsSample) -> StatusMap {
    VitalKey::ALL
        .into_iter()
        .map(|key| (key, classify(key, sample.value(key))))
        .collect()
}

/// Worst severity across a status map; `Normal` for an empty map.
pub fn overall_severity(statuses: &StatusMap) -> Severity {
    statuses
        .values()
        .copied()
        .max()
        .unwrap_or(Severity::Normal)
}

/// Human-readable normal range for a vital.
pub const fn reference_range(key: VitalKey) -> &'static str {
    match key {
        VitalKey::HeartRate => "60–100 bpm",
        VitalKey::SystolicBp => "90–120 mmHg",
        VitalKey::DiastolicBp => "60–80 mmHg",
        VitalKey::Spo2 => "≥95%",
        VitalKey::Temperature => "36.1–37.2°C",
        VitalKey::RespiratoryRate => "12–20 br/min",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
