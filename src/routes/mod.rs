//! HTTP route definitions and handlers.
//!
//! The exporter only serves the scrape endpoint and a health check.

mod health_routes;
mod metrics;

use crate::state::AppState;
use axum::Router;

/// Creates the exporter router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(metrics::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
