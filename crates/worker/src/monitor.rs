//! Autonomous recording scheduler.
//!
//! [`AutonomousMonitor`] records one simulated sample immediately on start
//! and then one per recording period until stopped, while a one-second
//! countdown tells observers when the next recording is due. All work for a
//! session runs in a single spawned task so recordings never overlap.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use vitalwatch_core::monitor_state::MonitorState;
use vitalwatch_core::simulator::VitalsSimulator;
use vitalwatch_db::ReadingStore;
use vitalwatch_events::EventBus;

use crate::config::MonitorConfig;

/// Handle to a running recording session.
struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Everything a recording attempt needs, cheap to clone into the session task.
#[derive(Clone)]
struct Recorder {
    store: Arc<dyn ReadingStore>,
    simulator: Arc<Mutex<VitalsSimulator>>,
    event_bus: Arc<EventBus>,
    state: Arc<watch::Sender<MonitorState>>,
}

impl Recorder {
    /// Apply `update` unless `cancel` has fired. The check runs under the
    /// state lock, so nothing lands after `end_session` deactivates.
    fn apply_if_live(
        &self,
        cancel: &CancellationToken,
        update: impl FnOnce(&mut MonitorState),
    ) -> bool {
        self.state.send_if_modified(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            update(state);
            true
        })
    }

    /// Generate one sample and persist it.
    ///
    /// The outcome is dropped if `cancel` fired while the write was in flight.
    async fn record_once(&self, cancel: &CancellationToken) {
        let sample = self.simulator.lock().await.generate_sample();
        let result = self.store.write(&sample).await;

        let applied = match &result {
            Ok(()) => self.apply_if_live(cancel, |s| s.record_succeeded(Utc::now())),
            Err(e) => {
                let message = format!("Failed to record reading: {e}");
                self.apply_if_live(cancel, |s| s.record_failed(message))
            }
        };
        if !applied {
            tracing::debug!(
                timestamp = sample.timestamp,
                "Monitor stopped during write, discarding outcome"
            );
            return;
        }

        match result {
            Ok(()) => {
                self.event_bus.invalidate_readings(sample.timestamp);
                tracing::info!(
                    timestamp = sample.timestamp,
                    heart_rate = sample.values.heart_rate,
                    spo2 = sample.values.spo2,
                    "Vitals recorded"
                );
            }
            Err(e) => tracing::warn!(error = %e, "Vitals recording failed"),
        }
    }

    /// Session task: the immediate attempt, then periodic recordings plus
    /// the countdown until cancelled.
    ///
    /// `first_attempt` fires once the immediate attempt has settled.
    async fn run(
        self,
        period: Duration,
        tick: Duration,
        cancel: CancellationToken,
        first_attempt: oneshot::Sender<()>,
    ) {
        self.record_once(&cancel).await;
        let activated = self.apply_if_live(&cancel, MonitorState::activate);
        // The receiver is gone if the caller of `start` was dropped.
        let _ = first_attempt.send(());
        if !activated {
            return;
        }

        let started = Instant::now();

        let mut recording = interval_at(started + period, period);
        recording.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut countdown = interval_at(started + tick, tick);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // Countdown before recording so a coinciding tick cannot
            // decrement the freshly reset countdown.
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Autonomous monitor session ending");
                    break;
                }
                _ = countdown.tick() => {
                    self.apply_if_live(&cancel, MonitorState::tick_countdown);
                }
                _ = recording.tick() => {
                    self.record_once(&cancel).await;
                }
            }
        }
    }
}

/// Periodic vitals recorder with start/stop control.
pub struct AutonomousMonitor {
    recorder: Recorder,
    config: MonitorConfig,
    session: Mutex<Option<Session>>,
}

impl AutonomousMonitor {
    /// Build a stopped monitor. The store handle must already be usable.
    pub fn new(
        store: Arc<dyn ReadingStore>,
        event_bus: Arc<EventBus>,
        config: MonitorConfig,
        simulator: VitalsSimulator,
    ) -> Self {
        let (state, _) = watch::channel(MonitorState::new(config.period_secs()));
        Self {
            recorder: Recorder {
                store,
                simulator: Arc::new(Mutex::new(simulator)),
                event_bus,
                state: Arc::new(state),
            },
            config,
            session: Mutex::new(None),
        }
    }

    /// Start recording.
    ///
    /// The session task is spawned first and makes the immediate attempt,
    /// so dropping this future never strands the monitor in `Starting`.
    /// Waits for that attempt to settle before returning. Returns `false`
    /// without side effects when a session is already running.
    pub async fn start(&self) -> bool {
        let first_attempt = {
            let mut session = self.session.lock().await;
            if session.as_ref().is_some_and(|s| !s.handle.is_finished()) {
                tracing::debug!("Autonomous monitor already running");
                return false;
            }

            let cancel = CancellationToken::new();
            let (first_tx, first_rx) = oneshot::channel();
            self.recorder.state.send_modify(MonitorState::begin_start);

            let handle = tokio::spawn(self.recorder.clone().run(
                self.config.record_interval,
                self.config.countdown_tick,
                cancel.clone(),
                first_tx,
            ));
            *session = Some(Session { cancel, handle });
            first_rx
        };

        tracing::info!(
            interval_secs = self.config.record_interval.as_secs(),
            "Autonomous monitor started"
        );
        // Errs only if the session task is dropped before it reports back.
        let _ = first_attempt.await;
        true
    }

    /// Stop recording. Safe to call repeatedly; returns whether a session
    /// was running.
    pub async fn stop(&self) -> bool {
        self.end_session().await.is_some()
    }

    /// Stop and wait up to `timeout` for the session task to finish.
    pub async fn shutdown(&self, timeout: Duration) {
        if let Some(handle) = self.end_session().await {
            if tokio::time::timeout(timeout, handle).await.is_err() {
                tracing::warn!("Autonomous monitor session did not finish in time");
            }
        }
    }

    async fn end_session(&self) -> Option<JoinHandle<()>> {
        let session = self.session.lock().await.take();
        // Cancel before deactivating so no in-flight outcome lands after.
        if let Some(session) = &session {
            session.cancel.cancel();
        }
        self.recorder.state.send_modify(MonitorState::deactivate);

        let session = session?;
        tracing::info!("Autonomous monitor stopped");
        Some(session.handle)
    }

    pub fn state(&self) -> MonitorState {
        self.recorder.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.recorder.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.recorder.state.borrow().is_active
    }
}

impl Drop for AutonomousMonitor {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.cancel.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
