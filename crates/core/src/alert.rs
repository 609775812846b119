//! Active alert derivation and per-sample dismissal tracking.
//!
//! An alert is identified by `(vital, sample timestamp)`. Identities are
//! stable while the same sample is observed and distinct across samples, so
//! a repeated abnormal value on a new sample surfaces again even if the
//! previous one was dismissed.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::thresholds::{evaluate_sample, StatusMap};
use crate::types::TimestampNanos;
use crate::vitals::{VitalKey, VitalsSample};

/// Severity level of an active alert. `Normal` never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Outside the normal band but inside the warning band.
    Warning,
    /// Outside every warning band.
    Critical,
}

impl AlertLevel {
    /// Banner headline, e.g. `"CRITICAL"`.
    pub const fn headline(self) -> &'static str {
        match self {
            AlertLevel::Warning => "WARNING",
            AlertLevel::Critical => "CRITICAL",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            AlertLevel::Warning => "is outside normal range",
            AlertLevel::Critical => "requires immediate attention",
        }
    }
}

// ---------------------------------------------------------------------------
// AlertId
// ---------------------------------------------------------------------------

/// Alert identity: one vital of one sample.
///
/// Rendered as `"<vitalKey>-<timestampNanos>"`, e.g. `"heartRate-1700000000000000000"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId {
    pub vital: VitalKey,
    pub sample_timestamp: TimestampNanos,
}

impl AlertId {
    pub fn new(vital: VitalKey, sample_timestamp: TimestampNanos) -> Self {
        Self {
            vital,
            sample_timestamp,
        }
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.vital, self.sample_timestamp)
    }
}

impl FromStr for AlertId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Vital names never contain '-', so the timestamp keeps its sign.
        let (vital, timestamp) = s
            .split_once('-')
            .ok_or_else(|| format!("malformed alert id '{s}'"))?;
        let vital = vital.parse::<VitalKey>()?;
        let sample_timestamp = timestamp
            .parse::<TimestampNanos>()
            .map_err(|_| format!("malformed alert timestamp in '{s}'"))?;
        Ok(Self::new(vital, sample_timestamp))
    }
}

impl Serialize for AlertId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// AlertEntry
// ---------------------------------------------------------------------------

/// A single active alert for the most recent sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEntry {
    pub id: AlertId,
    pub vital: VitalKey,
    pub label: &'static str,
    /// Value formatted at the vital's display precision.
    pub value: String,
    pub unit: &'static str,
    pub level: AlertLevel,
    pub headline: &'static str,
    pub guidance: &'static str,
}

/// Derive the active alerts for `sample`, in fixed vital order.
///
/// Normal vitals and identities in `dismissed` are skipped.
pub fn active_alerts(
    sample: &VitalsSample,
    statuses: &StatusMap,
    dismissed: &HashSet<AlertId>,
) -> Vec<AlertEntry> {
    let mut alerts = Vec::new();

    for key in VitalKey::ALL {
        let Some(level) = statuses.get(&key).and_then(|s| s.alert_level()) else {
            continue;
        };

        let id = AlertId::new(key, sample.timestamp);
        if dismissed.contains(&id) {
            continue;
        }

        let info = key.info();
        alerts.push(AlertEntry {
            id,
            vital: key,
            label: info.label,
            value: info.format(sample.value(key)),
            unit: info.unit,
            level,
            headline: level.headline(),
            guidance: level.guidance(),
        });
    }

    alerts
}

// ---------------------------------------------------------------------------
// AlertTracker
// ---------------------------------------------------------------------------

/// Holds the dismissal set for the currently observed sample.
///
/// The set is cleared in full whenever a sample with a different timestamp
/// is observed.
#[derive(Debug, Default)]
pub struct AlertTracker {
    observed: Option<TimestampNanos>,
    dismissed: HashSet<AlertId>,
}

impl AlertTracker {
    /// Create a tracker that has not observed any sample yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `sample` and return its active alerts.
    ///
    /// A timestamp different from the previously observed one resets all
    /// dismissals.
    pub fn observe(&mut self, sample: &VitalsSample) -> Vec<AlertEntry> {
        if self.observed != Some(sample.timestamp) {
            self.observed = Some(sample.timestamp);
            self.dismissed.clear();
        }
        self.active_alerts(sample)
    }

    /// Active alerts for `sample` under the current dismissal set, without
    /// changing the observed sample.
    pub fn active_alerts(&self, sample: &VitalsSample) -> Vec<AlertEntry> {
        active_alerts(sample, &evaluate_sample(sample), &self.dismissed)
    }

    /// Dismiss one alert of the observed sample.
    ///
    /// Returns `true` if the identity was newly dismissed. Identities that
    /// belong to any other sample are ignored.
    pub fn dismiss(&mut self, id: AlertId) -> bool {
        if self.observed != Some(id.sample_timestamp) {
            return false;
        }
        self.dismissed.insert(id)
    }

    pub fn observed_timestamp(&self) -> Option<TimestampNanos> {
        self.observed
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissed.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::VitalValues;

    fn sample_at(timestamp: TimestampNanos, heart_rate: f64) -> VitalsSample {
        VitalsSample::new(
            VitalValues {
                heart_rate,
                systolic_bp: 115.0,
                diastolic_bp: 75.0,
                spo2: 98.2,
                temperature: 36.7,
                respiratory_rate: 15.0,
            },
            timestamp,
        )
    }

    #[test]
    fn normal_sample_has_no_alerts() {
        let mut tracker = AlertTracker::new();
        assert!(tracker.observe(&sample_at(1, 72.0)).is_empty());
    }

    #[test]
    fn critical_heart_rate_raises_alert() {
        let mut tracker = AlertTracker::new();
        let alerts = tracker.observe(&sample_at(10, 140.0));

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.id, AlertId::new(VitalKey::HeartRate, 10));
        assert_eq!(alert.level, AlertLevel::Critical);
        assert_eq!(alert.label, "Heart Rate");
        assert_eq!(alert.value, "140");
        assert_eq!(alert.unit, "bpm");
        assert_eq!(alert.headline, "CRITICAL");
    }

    #[test]
    fn alerts_follow_fixed_vital_order() {
        let mut sample = sample_at(5, 130.0);
        sample.values = sample
            .values
            .with(VitalKey::RespiratoryRate, 30.0)
            .with(VitalKey::Spo2, 92.0);
        let alerts = AlertTracker::new().observe(&sample);
        let vitals: Vec<_> = alerts.iter().map(|a| a.vital).collect();
        assert_eq!(
            vitals,
            vec![VitalKey::HeartRate, VitalKey::Spo2, VitalKey::RespiratoryRate]
        );
        assert_eq!(alerts[1].level, AlertLevel::Warning);
    }

    #[test]
    fn dismissal_hides_alert_for_same_sample() {
        let mut tracker = AlertTracker::new();
        let sample = sample_at(10, 140.0);
        let id = tracker.observe(&sample)[0].id;

        assert!(tracker.dismiss(id));
        assert!(!tracker.dismiss(id), "second dismissal is a no-op");
        assert!(tracker.observe(&sample).is_empty());
        assert_eq!(tracker.dismissed_count(), 1);
    }

    #[test]
    fn new_sample_resets_dismissals_even_for_identical_values() {
        let mut tracker = AlertTracker::new();
        let first = sample_at(1_000, 140.0);
        let id = tracker.observe(&first)[0].id;
        tracker.dismiss(id);
        assert!(tracker.observe(&first).is_empty());

        let second = sample_at(2_000, 140.0);
        let alerts = tracker.observe(&second);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, AlertId::new(VitalKey::HeartRate, 2_000));
        assert_eq!(tracker.dismissed_count(), 0);
    }

    #[test]
    fn dismissing_other_sample_identity_is_ignored() {
        let mut tracker = AlertTracker::new();
        tracker.observe(&sample_at(2_000, 140.0));
        assert!(!tracker.dismiss(AlertId::new(VitalKey::HeartRate, 1_000)));
        assert_eq!(tracker.observe(&sample_at(2_000, 140.0)).len(), 1);
    }

    #[test]
    fn alert_id_round_trips_through_string() {
        let id = AlertId::new(VitalKey::DiastolicBp, 1_700_000_000_123_456_789);
        let rendered = id.to_string();
        assert_eq!(rendered, "diastolicBP-1700000000123456789");
        assert_eq!(rendered.parse::<AlertId>(), Ok(id));
        assert!("heartRate".parse::<AlertId>().is_err());
        assert!("pulse-12".parse::<AlertId>().is_err());
        assert!("heartRate-abc".parse::<AlertId>().is_err());
    }

    #[test]
    fn alert_id_with_negative_timestamp_round_trips() {
        let id = AlertId::new(VitalKey::HeartRate, -5);
        let rendered = id.to_string();
        assert_eq!(rendered, "heartRate--5");
        assert_eq!(rendered.parse::<AlertId>(), Ok(id));
        assert!("heartRate---5".parse::<AlertId>().is_err());
    }

    #[test]
    fn alert_entry_serializes_id_as_string() {
        let alerts = AlertTracker::new().observe(&sample_at(7, 45.0));
        let json = serde_json::to_value(&alerts[0]).expect("serialize");
        assert_eq!(json["id"], "heartRate-7");
        assert_eq!(json["level"], "critical");
        assert_eq!(json["vital"], "heartRate");
    }
}
