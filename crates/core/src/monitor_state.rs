//! Recording scheduler state and its pure transitions.
//!
//! The async scheduler in the `worker` crate owns the timers; this module
//! only describes how [`MonitorState`] changes in response to them so the
//! rules can be tested without a runtime.

use serde::Serialize;

use crate::types::Timestamp;

/// Lifecycle phase of the recording scheduler.
///
/// `Stopped -> Starting -> Running -> Stopped`. Failed recordings keep the
/// scheduler in `Running` with `last_error` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorPhase {
    Stopped,
    Starting,
    Running,
}

/// Observable state of the recording scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub phase: MonitorPhase,
    pub is_active: bool,
    /// Wall-clock time of the last successful recording.
    pub last_recorded_at: Option<Timestamp>,
    /// Countdown shown to the user; always in `1..=period_secs`.
    pub seconds_until_next: u32,
    pub last_error: Option<String>,
    pub period_secs: u32,
    pub recorded_count: u64,
    pub failed_count: u64,
}

impl MonitorState {
    /// A stopped scheduler with the countdown at the full period.
    pub fn new(period_secs: u32) -> Self {
        let period_secs = period_secs.max(1);
        Self {
            phase: MonitorPhase::Stopped,
            is_active: false,
            last_recorded_at: None,
            seconds_until_next: period_secs,
            last_error: None,
            period_secs,
            recorded_count: 0,
            failed_count: 0,
        }
    }

    pub fn begin_start(&mut self) {
        self.phase = MonitorPhase::Starting;
    }

    /// Timers are armed; recordings now repeat every period and the
    /// countdown restarts from the full period.
    pub fn activate(&mut self) {
        self.phase = MonitorPhase::Running;
        self.is_active = true;
        self.seconds_until_next = self.period_secs;
    }

    pub fn deactivate(&mut self) {
        self.phase = MonitorPhase::Stopped;
        self.is_active = false;
    }

    /// One-second countdown tick. Wraps back to the full period instead of
    /// dropping below 1.
    pub fn tick_countdown(&mut self) {
        if self.seconds_until_next <= 1 {
            self.seconds_until_next = self.period_secs;
        } else {
            self.seconds_until_next -= 1;
        }
    }

    pub fn record_succeeded(&mut self, at: Timestamp) {
        self.last_recorded_at = Some(at);
        self.last_error = None;
        self.recorded_count += 1;
        self.seconds_until_next = self.period_secs;
    }

    /// A failed attempt keeps `last_recorded_at` and still resets the countdown.
    pub fn record_failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.failed_count += 1;
        self.seconds_until_next = self.period_secs;
    }

    /// Active with no outstanding error.
    pub fn is_healthy(&self) -> bool {
        self.is_active && self.last_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_state_is_stopped_with_full_countdown() {
        let state = MonitorState::new(30);
        assert_eq!(state.phase, MonitorPhase::Stopped);
        assert!(!state.is_active);
        assert_eq!(state.seconds_until_next, 30);
        assert!(!state.is_healthy());
    }

    #[test]
    fn zero_period_is_raised_to_one_second() {
        let mut state = MonitorState::new(0);
        assert_eq!(state.period_secs, 1);
        state.tick_countdown();
        assert_eq!(state.seconds_until_next, 1);
    }

    #[test]
    fn countdown_wraps_instead_of_reaching_zero() {
        let mut state = MonitorState::new(3);
        state.tick_countdown();
        assert_eq!(state.seconds_until_next, 2);
        state.tick_countdown();
        assert_eq!(state.seconds_until_next, 1);
        state.tick_countdown();
        assert_eq!(state.seconds_until_next, 3);
    }

    #[test]
    fn lifecycle_transitions() {
        let mut state = MonitorState::new(30);
        state.begin_start();
        assert_eq!(state.phase, MonitorPhase::Starting);
        assert!(!state.is_active);
        state.activate();
        assert_eq!(state.phase, MonitorPhase::Running);
        assert!(state.is_healthy());
        state.deactivate();
        assert_eq!(state.phase, MonitorPhase::Stopped);
        assert!(!state.is_active);
    }

    #[test]
    fn failure_keeps_last_success_and_resets_countdown() {
        let mut state = MonitorState::new(30);
        state.activate();
        let at = Utc::now();
        state.record_succeeded(at);
        state.tick_countdown();
        state.tick_countdown();
        assert_eq!(state.seconds_until_next, 28);

        state.record_failed("store unavailable");
        assert_eq!(state.last_recorded_at, Some(at));
        assert_eq!(state.last_error.as_deref(), Some("store unavailable"));
        assert_eq!(state.seconds_until_next, 30);
        assert!(state.is_active);
        assert!(!state.is_healthy());

        state.record_succeeded(Utc::now());
        assert!(state.last_error.is_none());
        assert_eq!(state.recorded_count, 2);
        assert_eq!(state.failed_count, 1);
    }
}
