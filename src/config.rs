//! Runtime configuration from environment variables

use crate::analytics_core::record::DEFAULT_CHUNK_SIZE;
use std::env;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Records per processing step. Bounds per-step latency only; never
    /// changes computed results.
    pub chunk_size: usize,
    /// Default state of the welcome-bonus toggle.
    pub include_bonus: bool,
    pub rust_log: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let chunk_size = env::var("CHUNK_SIZE")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_CHUNK_SIZE);

        let include_bonus = env::var("INCLUDE_BONUS")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse::<bool>()
            .unwrap_or(true);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            chunk_size,
            include_bonus,
            rust_log,
        }
    }
}
