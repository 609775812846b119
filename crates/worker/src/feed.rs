//! Live dashboard feed.
//!
//! Keeps the most recent sample and its alert dismissals in step with the
//! readings store by re-reading the latest sample whenever the event bus
//! reports that it went stale.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use vitalwatch_core::alert::{AlertEntry, AlertId, AlertTracker};
use vitalwatch_core::thresholds::{evaluate_sample, overall_severity, Severity, StatusMap};
use vitalwatch_core::vitals::VitalsSample;
use vitalwatch_db::{ReadingStore, StoreError};
use vitalwatch_events::{InvalidationTopic, ReadingEvent};

/// What the dashboard renders for the latest sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub latest: Option<VitalsSample>,
    pub statuses: Option<StatusMap>,
    pub overall: Option<Severity>,
    pub alerts: Vec<AlertEntry>,
}

impl DashboardSnapshot {
    fn empty() -> Self {
        Self {
            latest: None,
            statuses: None,
            overall: None,
            alerts: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct FeedState {
    latest: Option<VitalsSample>,
    tracker: AlertTracker,
}

impl FeedState {
    fn snapshot(&mut self) -> DashboardSnapshot {
        let Some(sample) = self.latest else {
            return DashboardSnapshot::empty();
        };
        let statuses = evaluate_sample(&sample);
        let overall = overall_severity(&statuses);
        let alerts = self.tracker.observe(&sample);
        DashboardSnapshot {
            latest: Some(sample),
            statuses: Some(statuses),
            overall: Some(overall),
            alerts,
        }
    }
}

/// Latest-sample view with per-sample alert dismissal.
pub struct LiveFeed {
    store: Arc<dyn ReadingStore>,
    state: Mutex<FeedState>,
}

impl LiveFeed {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self {
            store,
            state: Mutex::new(FeedState::default()),
        }
    }

    /// Re-read the latest sample from the store and observe it.
    ///
    /// A fetched sample older than the one already held is ignored, so
    /// concurrent refreshes never move the feed backwards.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, StoreError> {
        let fetched = self.store.read_latest().await?;

        let mut state = self.state.lock().await;
        let previous = state.tracker.observed_timestamp();
        match (fetched, state.latest) {
            (Some(new), Some(held)) if new.timestamp < held.timestamp => {}
            (Some(new), _) => state.latest = Some(new),
            (None, _) => {}
        }

        let snapshot = state.snapshot();
        if let Some(sample) = snapshot.latest {
            if previous != Some(sample.timestamp) {
                log_alerts(&snapshot.alerts);
            }
        }
        Ok(snapshot)
    }

    /// Snapshot of the held sample without touching the store.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Dismiss one alert of the held sample.
    ///
    /// Returns whether the alert was newly dismissed.
    pub async fn dismiss(&self, id: AlertId) -> bool {
        let dismissed = self.state.lock().await.tracker.dismiss(id);
        if dismissed {
            tracing::info!(alert_id = %id, "Alert dismissed");
        } else {
            tracing::debug!(alert_id = %id, "Dismissal ignored");
        }
        dismissed
    }

    /// Consume invalidation events until cancelled or the bus closes.
    pub async fn run(
        self: Arc<Self>,
        mut events: broadcast::Receiver<ReadingEvent>,
        cancel: CancellationToken,
    ) {
        tracing::info!("Live feed started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Live feed stopping");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) if event.topic == InvalidationTopic::LatestReading => {
                        self.refresh_logged().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Live feed lagged, refreshing");
                        self.refresh_logged().await;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Event bus closed, live feed stopping");
                        break;
                    }
                },
            }
        }
    }

    async fn refresh_logged(&self) {
        if let Err(e) = self.refresh().await {
            tracing::error!(error = %e, "Live feed refresh failed");
        }
    }
}

fn log_alerts(alerts: &[AlertEntry]) {
    for alert in alerts {
        tracing::warn!(
            alert_id = %alert.id,
            vital = %alert.vital,
            value = %alert.value,
            unit = alert.unit,
            headline = alert.headline,
            "{} {}",
            alert.label,
            alert.guidance
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
