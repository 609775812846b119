use std::sync::Arc;

use vitalwatch_db::ReadingStore;
use vitalwatch_events::EventBus;
use vitalwatch_worker::{AutonomousMonitor, LiveFeed};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Readings store shared by handlers, the monitor and the live feed.
    pub store: Arc<dyn ReadingStore>,
    pub config: Arc<ServerConfig>,
    /// Invalidation events for the readings views.
    pub event_bus: Arc<EventBus>,
    pub monitor: Arc<AutonomousMonitor>,
    /// Latest sample and alert dismissals for the dashboard.
    pub feed: Arc<LiveFeed>,
}

impl AppState {
    /// Wire the monitor and feed around an already reachable store.
    pub fn new(store: Arc<dyn ReadingStore>, config: ServerConfig) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let monitor = Arc::new(AutonomousMonitor::new(
            Arc::clone(&store),
            Arc::clone(&event_bus),
            config.monitor.clone(),
            config.monitor.build_simulator(),
        ));
        let feed = Arc::new(LiveFeed::new(Arc::clone(&store)));

        Self {
            store,
            config: Arc::new(config),
            event_bus,
            monitor,
            feed,
        }
    }
}
