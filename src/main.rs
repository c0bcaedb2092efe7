use std::sync::Arc;

use prommongo::config::load_config;
use prommongo::startup;
use prommongo::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!(error = %e, "Exporter stopped");
        std::process::exit(1);
    }
}
