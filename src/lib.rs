
pub mod analytics_core;
pub mod config;
pub mod ingest_core;
pub mod report_core;
