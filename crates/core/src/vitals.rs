//! Vital catalogue and the immutable sample record.
//!
//! [`VitalKey::ALL`] fixes the iteration order used everywhere a vital list
//! is walked (classification maps, alert lists, API catalogues).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::TimestampNanos;

// ---------------------------------------------------------------------------
// VitalKey
// ---------------------------------------------------------------------------

/// One of the six monitored vital signs.
///
/// Variant order is the display order and drives `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VitalKey {
    #[serde(rename = "heartRate")]
    HeartRate,
    #[serde(rename = "systolicBP")]
    SystolicBp,
    #[serde(rename = "diastolicBP")]
    DiastolicBp,
    #[serde(rename = "spo2")]
    Spo2,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "respiratoryRate")]
    RespiratoryRate,
}

impl VitalKey {
    /// Every vital, in display order.
    pub const ALL: [VitalKey; 6] = [
        VitalKey::HeartRate,
        VitalKey::SystolicBp,
        VitalKey::DiastolicBp,
        VitalKey::Spo2,
        VitalKey::Temperature,
        VitalKey::RespiratoryRate,
    ];

    /// Wire name, e.g. `"heartRate"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            VitalKey::HeartRate => "heartRate",
            VitalKey::SystolicBp => "systolicBP",
            VitalKey::DiastolicBp => "diastolicBP",
            VitalKey::Spo2 => "spo2",
            VitalKey::Temperature => "temperature",
            VitalKey::RespiratoryRate => "respiratoryRate",
        }
    }

    /// Display metadata for this vital.
    pub const fn info(self) -> VitalInfo {
        match self {
            VitalKey::HeartRate => VitalInfo::new(self, "Heart Rate", "bpm", 0),
            VitalKey::SystolicBp => VitalInfo::new(self, "Systolic BP", "mmHg", 0),
            VitalKey::DiastolicBp => VitalInfo::new(self, "Diastolic BP", "mmHg", 0),
            VitalKey::Spo2 => VitalInfo::new(self, "SpO₂", "%", 1),
            VitalKey::Temperature => VitalInfo::new(self, "Temperature", "°C", 1),
            VitalKey::RespiratoryRate => VitalInfo::new(self, "Resp. Rate", "br/min", 0),
        }
    }
}

impl fmt::Display for VitalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown vital '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// VitalInfo
// ---------------------------------------------------------------------------

/// Label, unit, and display precision for a vital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VitalInfo {
    pub key: VitalKey,
    pub label: &'static str,
    pub unit: &'static str,
    /// Number of decimals shown when formatting a value.
    pub decimals: usize,
}

impl VitalInfo {
    const fn new(key: VitalKey, label: &'static str, unit: &'static str, decimals: usize) -> Self {
        Self {
            key,
            label,
            unit,
            decimals,
        }
    }

    /// Render a value at this vital's display precision (no unit).
    pub fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals)
    }
}

// ---------------------------------------------------------------------------
// Values and samples
// ---------------------------------------------------------------------------

/// The six numeric vital values, without a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalValues {
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,
    pub spo2: f64,
    pub temperature: f64,
    #[serde(rename = "respiratoryRate")]
    pub respiratory_rate: f64,
}

impl VitalValues {
    /// Build a value set by evaluating `f` once per vital.
    pub fn from_fn(mut f: impl FnMut(VitalKey) -> f64) -> Self {
        Self {
            heart_rate: f(VitalKey::HeartRate),
            systolic_bp: f(VitalKey::SystolicBp),
            diastolic_bp: f(VitalKey::DiastolicBp),
            spo2: f(VitalKey::Spo2),
            temperature: f(VitalKey::Temperature),
            respiratory_rate: f(VitalKey::RespiratoryRate),
        }
    }

    pub fn get(&self, key: VitalKey) -> f64 {
        match key {
            VitalKey::HeartRate => self.heart_rate,
            VitalKey::SystolicBp => self.systolic_bp,
            VitalKey::DiastolicBp => self.diastolic_bp,
            VitalKey::Spo2 => self.spo2,
            VitalKey::Temperature => self.temperature,
            VitalKey::RespiratoryRate => self.respiratory_rate,
        }
    }

    /// Return a copy with one vital replaced.
    pub fn with(mut self, key: VitalKey, value: f64) -> Self {
        let slot = match key {
            VitalKey::HeartRate => &mut self.heart_rate,
            VitalKey::SystolicBp => &mut self.systolic_bp,
            VitalKey::DiastolicBp => &mut self.diastolic_bp,
            VitalKey::Spo2 => &mut self.spo2,
            VitalKey::Temperature => &mut self.temperature,
            VitalKey::RespiratoryRate => &mut self.respiratory_rate,
        };
        *slot = value;
        self
    }
}

/// A single vitals measurement. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalsSample {
    #[serde(flatten)]
    pub values: VitalValues,
    /// Acquisition time in nanoseconds since the Unix epoch.
    pub timestamp: TimestampNanos,
}

impl VitalsSample {
    pub fn new(values: VitalValues, timestamp: TimestampNanos) -> Self {
        Self { values, timestamp }
    }

    pub fn value(&self, key: VitalKey) -> f64 {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_from_wire_names() {
        for key in VitalKey::ALL {
            assert_eq!(key.as_str().parse::<VitalKey>(), Ok(key));
        }
        assert!("bloodSugar".parse::<VitalKey>().is_err());
    }

    #[test]
    fn format_uses_vital_precision() {
        assert_eq!(VitalKey::HeartRate.info().format(72.6), "73");
        assert_eq!(VitalKey::Spo2.info().format(97.84), "97.8");
        assert_eq!(VitalKey::Temperature.info().format(36.66), "36.7");
    }

    #[test]
    fn with_replaces_only_target_vital() {
        let base = VitalValues::from_fn(|_| 1.0);
        let updated = base.with(VitalKey::Temperature, 38.0);
        for key in VitalKey::ALL {
            let expected = if key == VitalKey::Temperature { 38.0 } else { 1.0 };
            assert_eq!(updated.get(key), expected);
        }
    }

    #[test]
    fn sample_serializes_flat_with_wire_names() {
        let sample = VitalsSample::new(
            VitalValues {
                heart_rate: 72.0,
                systolic_bp: 115.0,
                diastolic_bp: 75.0,
                spo2: 98.2,
                temperature: 36.7,
                respiratory_rate: 15.0,
            },
            1_700_000_000_000_000_000,
        );
        let json = serde_json::to_value(sample).expect("serialize");
        assert_eq!(json["heartRate"], 72.0);
        assert_eq!(json["systolicBP"], 115.0);
        assert_eq!(json["diastolicBP"], 75.0);
        assert_eq!(json["respiratoryRate"], 15.0);
        assert_eq!(json["timestamp"], 1_700_000_000_000_000_000_i64);
    }
}
