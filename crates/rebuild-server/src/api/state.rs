//! Application state for API handlers

use rebuild_lookup::{LookupService, TransitiveExpander};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Index lookup service
    pub lookup: Arc<LookupService>,

    /// Transitive dependency expander
    pub expander: Arc<TransitiveExpander>,

    /// Server version
    pub version: String,

    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(lookup: Arc<LookupService>, expander: Arc<TransitiveExpander>) -> Self {
        Self {
            lookup,
            expander,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Registry host used when a request does not name one.
    pub fn default_registry(&self) -> &str {
        self.lookup.registries().default_host()
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
