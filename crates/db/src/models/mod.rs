//! Database row types and DTOs.

pub mod reading;
