//! Readings store for the vitals monitor.
//!
//! The monitor only depends on the [`ReadingStore`] contract. Two
//! implementations are provided: [`MemoryReadingStore`] for single-process
//! use and tests, and [`PgReadingStore`] backed by PostgreSQL.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryReadingStore;
pub use repositories::PgReadingStore;
pub use store::ReadingStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Pick the readings store for a process.
///
/// With a database URL the pool is created and migrations are applied
/// before the store is handed out; without one an empty in-memory store
/// is used.
pub async fn connect_store(database_url: Option<&str>) -> Result<Arc<dyn ReadingStore>, StoreError> {
    let Some(url) = database_url else {
        tracing::info!("DATABASE_URL not set, using in-memory readings store");
        return Ok(Arc::new(MemoryReadingStore::new()));
    };

    let pool = create_pool(url).await?;
    run_migrations(&pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("migrations failed: {e}")))?;
    tracing::info!("Connected to PostgreSQL readings store");
    Ok(Arc::new(PgReadingStore::new(pool)))
}
