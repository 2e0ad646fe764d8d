pub mod config;
pub mod staging_report;
