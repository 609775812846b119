//! Headless monitor: records vitals on a fixed cadence and logs alerts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitalwatch_events::EventBus;
use vitalwatch_worker::signal::shutdown_signal;
use vitalwatch_worker::{AutonomousMonitor, LiveFeed, MonitorConfig};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalwatch_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MonitorConfig::from_env().context("invalid monitor configuration")?;
    tracing::info!(
        interval_secs = config.record_interval.as_secs(),
        seeded = config.simulator_seed.is_some(),
        "Loaded monitor configuration"
    );

    let database_url = std::env::var("DATABASE_URL").ok();
    let store = vitalwatch_db::connect_store(database_url.as_deref())
        .await
        .context("failed to open readings store")?;

    let event_bus = Arc::new(EventBus::default());

    // The feed subscribes before the first recording so it sees it.
    let cancel = CancellationToken::new();
    let feed = Arc::new(LiveFeed::new(Arc::clone(&store)));
    let feed_handle = tokio::spawn(Arc::clone(&feed).run(event_bus.subscribe(), cancel.clone()));

    let simulator = config.build_simulator();
    let monitor = AutonomousMonitor::new(store, Arc::clone(&event_bus), config, simulator);
    monitor.start().await;

    shutdown_signal().await;

    monitor.shutdown(SHUTDOWN_GRACE).await;
    cancel.cancel();
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, feed_handle).await;

    let state = monitor.state();
    tracing::info!(
        recorded = state.recorded_count,
        failed = state.failed_count,
        "Headless monitor stopped"
    );
    Ok(())
}
