pub mod dashboard;
pub mod monitor;
pub mod readings;
pub mod vitals;
