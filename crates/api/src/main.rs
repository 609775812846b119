use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitalwatch_api::config::ServerConfig;
use vitalwatch_api::router::build_app_router;
use vitalwatch_api::state::AppState;
use vitalwatch_db::ReadingStore;
use vitalwatch_worker::signal::shutdown_signal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalwatch_api=debug,vitalwatch_worker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Readings store ---
    let store = vitalwatch_db::connect_store(config.database_url.as_deref())
        .await
        .expect("Failed to open readings store");
    store
        .ping()
        .await
        .expect("Readings store health check failed");
    tracing::info!("Readings store health check passed");

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let autostart = config.monitor_autostart;
    let state = AppState::new(store, config.clone());

    // Spawn the live feed (follows the latest sample for the dashboard).
    let feed_cancel = CancellationToken::new();
    let feed_handle = tokio::spawn(
        state
            .feed
            .clone()
            .run(state.event_bus.subscribe(), feed_cancel.clone()),
    );
    tracing::info!("Live feed started");

    // --- Autonomous monitor ---
    if autostart {
        state.monitor.start().await;
    } else {
        tracing::info!("Monitor autostart disabled; waiting for POST /api/v1/monitor/start");
    }

    let monitor = state.monitor.clone();
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    monitor.shutdown(shutdown_timeout).await;
    tracing::info!("Autonomous monitor stopped");

    feed_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, feed_handle).await;
    tracing::info!("Live feed stopped");

    tracing::info!("Graceful shutdown complete");
}
