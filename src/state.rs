//! Shared application state.
//!
//! Contains the state shared across the exporter's HTTP handlers.

use crate::config::ConfigV1;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Registry holding the MongoDB collectors.
    pub metrics: Metrics,
}
