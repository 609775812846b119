//! Manual vitals entry validation.
//!
//! Entry bounds reject physically impossible values (a heart rate of 500).
//! They are deliberately wider than the clinical bands: an abnormal but
//! possible value is accepted here and flagged later by the classifier.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::vitals::{VitalKey, VitalValues};

/// Inclusive physical bounds `(min, max)` accepted from manual entry.
pub const fn entry_bounds(key: VitalKey) -> (f64, f64) {
    match key {
        VitalKey::HeartRate => (30.0, 220.0),
        VitalKey::SystolicBp => (70.0, 250.0),
        VitalKey::DiastolicBp => (40.0, 150.0),
        VitalKey::Spo2 => (70.0, 100.0),
        VitalKey::Temperature => (30.0, 45.0),
        VitalKey::RespiratoryRate => (5.0, 40.0),
    }
}

/// Per-field validation messages, keyed by vital.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<VitalKey, String>);

impl FieldErrors {
    pub fn get(&self, key: VitalKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: VitalKey, message: String) {
        self.0.insert(key, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{key}: {message}")?;
        }
        Ok(())
    }
}

/// Manually entered vitals. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualEntry {
    #[serde(rename = "heartRate")]
    pub heart_rate: Option<f64>,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: Option<f64>,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: Option<f64>,
    pub spo2: Option<f64>,
    pub temperature: Option<f64>,
    #[serde(rename = "respiratoryRate")]
    pub respiratory_rate: Option<f64>,
}

impl ManualEntry {
    pub fn get(&self, key: VitalKey) -> Option<f64> {
        match key {
            VitalKey::HeartRate => self.heart_rate,
            VitalKey::SystolicBp => self.systolic_bp,
            VitalKey::DiastolicBp => self.diastolic_bp,
            VitalKey::Spo2 => self.spo2,
            VitalKey::Temperature => self.temperature,
            VitalKey::RespiratoryRate => self.respiratory_rate,
        }
    }
}

impl From<VitalValues> for ManualEntry {
    fn from(values: VitalValues) -> Self {
        Self {
            heart_rate: Some(values.heart_rate),
            systolic_bp: Some(values.systolic_bp),
            diastolic_bp: Some(values.diastolic_bp),
            spo2: Some(values.spo2),
            temperature: Some(values.temperature),
            respiratory_rate: Some(values.respiratory_rate),
        }
    }
}

/// Check a single value against the vital's physical bounds.
fn check_value(key: VitalKey, value: Option<f64>) -> Result<f64, String> {
    let info = key.info();
    let value = value.ok_or_else(|| format!("{} is required", info.label))?;
    if !value.is_finite() {
        return Err("Must be a valid number".to_string());
    }
    let (min, max) = entry_bounds(key);
    if value < min || value > max {
        return Err(format!("Must be between {min} and {max} {}", info.unit));
    }
    Ok(value)
}

/// Parse and validate one textual field, e.g. from a form.
pub fn parse_field(key: VitalKey, raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return check_value(key, None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| "Must be a valid number".to_string())?;
    check_value(key, Some(value))
}

/// Validate every field of a manual entry.
///
/// All failing fields are reported together in [`CoreError::InvalidEntry`].
pub fn validate_entry(entry: &ManualEntry) -> Result<VitalValues, CoreError> {
    let mut errors = FieldErrors::default();
    let mut accepted = VitalValues::from_fn(|_| 0.0);

    for key in VitalKey::ALL {
        match check_value(key, entry.get(key)) {
            Ok(value) => accepted = accepted.with(key, value),
            Err(message) => errors.insert(key, message),
        }
    }

    if errors.is_empty() {
        Ok(accepted)
    } else {
        Err(CoreError::InvalidEntry(errors))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::profile;
    use crate::thresholds::{classify, Severity};
    use assert_matches::assert_matches;

    fn valid_entry() -> ManualEntry {
        ManualEntry {
            heart_rate: Some(72.0),
            systolic_bp: Some(120.0),
            diastolic_bp: Some(80.0),
            spo2: Some(98.0),
            temperature: Some(36.6),
            respiratory_rate: Some(16.0),
        }
    }

    #[test]
    fn accepts_valid_entry() {
        let values = validate_entry(&valid_entry()).expect("valid entry");
        assert_eq!(values.heart_rate, 72.0);
        assert_eq!(values.temperature, 36.6);
    }

    #[test]
    fn accepts_abnormal_but_possible_values() {
        let mut entry = valid_entry();
        entry.heart_rate = Some(180.0);
        let values = validate_entry(&entry).expect("180 bpm is possible");
        assert_eq!(classify(VitalKey::HeartRate, values.heart_rate), Severity::Critical);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(parse_field(VitalKey::HeartRate, "30"), Ok(30.0));
        assert_eq!(parse_field(VitalKey::HeartRate, "220"), Ok(220.0));
        assert!(parse_field(VitalKey::HeartRate, "29.9").is_err());
        assert!(parse_field(VitalKey::HeartRate, "220.1").is_err());
    }

    #[test]
    fn reports_every_failing_field() {
        let entry = ManualEntry {
            heart_rate: Some(500.0),
            spo2: Some(f64::NAN),
            ..valid_entry()
        };
        let entry = ManualEntry {
            temperature: None,
            ..entry
        };

        let err = validate_entry(&entry).unwrap_err();
        assert_matches!(&err, CoreError::InvalidEntry(fields) if fields.len() == 3);
        let CoreError::InvalidEntry(fields) = err else {
            unreachable!()
        };
        assert_eq!(
            fields.get(VitalKey::HeartRate),
            Some("Must be between 30 and 220 bpm")
        );
        assert_eq!(fields.get(VitalKey::Spo2), Some("Must be a valid number"));
        assert_eq!(
            fields.get(VitalKey::Temperature),
            Some("Temperature is required")
        );
        assert_eq!(fields.get(VitalKey::SystolicBp), None);
    }

    #[test]
    fn parse_field_messages() {
        assert_eq!(
            parse_field(VitalKey::RespiratoryRate, "  "),
            Err("Resp. Rate is required".to_string())
        );
        assert_eq!(
            parse_field(VitalKey::Temperature, "warm"),
            Err("Must be a valid number".to_string())
        );
        assert_eq!(
            parse_field(VitalKey::Temperature, "29"),
            Err("Must be between 30 and 45 °C".to_string())
        );
        assert_eq!(parse_field(VitalKey::Spo2, " 97.5 "), Ok(97.5));
    }

    #[test]
    fn simulator_ranges_fit_inside_entry_bounds() {
        for key in VitalKey::ALL {
            let (min, max) = entry_bounds(key);
            let p = profile(key);
            assert!(p.min >= min && p.max <= max, "{key} simulator range exceeds entry bounds");
        }
    }

    #[test]
    fn field_errors_display_joins_messages() {
        let mut errors = FieldErrors::default();
        errors.insert(VitalKey::HeartRate, "bad".into());
        errors.insert(VitalKey::Spo2, "worse".into());
        assert_eq!(errors.to_string(), "heartRate: bad; spo2: worse");
    }
}
