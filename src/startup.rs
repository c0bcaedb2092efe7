//! Exporter startup and server initialization.
//!
//! Builds the instrumented MongoDB client, checks connectivity and serves
//! the scrape endpoint.

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ConfigV1;
use crate::driver::instrument;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;

/// Builds an instrumented client for the configured deployment.
///
/// Server connections are opened lazily by the driver; `mongodb+srv://`
/// URIs still resolve DNS while parsing. Every pool and command event from
/// then on feeds `metrics`.
pub async fn connect(config: &ConfigV1, metrics: &Metrics) -> Result<Client> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(&config.mongodb.uri).await?;
    client_options.app_name = Some(
        config
            .mongodb
            .app_name
            .clone()
            .unwrap_or_else(|| "prommongo".to_string()),
    );
    instrument(&mut client_options, metrics);

    Ok(Client::with_options(client_options)?)
}

/// Initializes and runs the exporter.
///
/// A failed initial ping is logged but not fatal: the collectors keep
/// reporting whatever the driver emits while it retries.
///
/// # Errors
///
/// Returns an error if the metrics cannot be registered, the MongoDB URI
/// is invalid, or the server fails to bind or serve.
pub async fn run(config: Arc<ConfigV1>) -> Result<()> {
    let metrics = Metrics::new(&config.metrics)?;
    let client = connect(&config, &metrics).await?;

    match client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await
    {
        Ok(_) => info!("MongoDB ping succeeded"),
        Err(e) => warn!(error = %e, "MongoDB ping failed"),
    }

    info!("Starting exporter on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        metrics,
    };
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
