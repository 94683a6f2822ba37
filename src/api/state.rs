//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks. The wide
//! table is read-only, so handlers never lock.

use crate::config::ApiConfig;
use crate::dataset::WideTable;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The reshaped dataset, built once at startup
    pub table: Arc<WideTable>,
    /// Where the dataset was loaded from
    pub source: String,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState around a loaded table
    pub fn new(table: WideTable, source: impl Into<String>, config: ApiConfig) -> Self {
        Self {
            table: Arc::new(table),
            source: source.into(),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
