//! Repositories over the PostgreSQL schema.

pub mod reading_repo;

pub use reading_repo::{PgReadingStore, VitalsReadingRepo};
