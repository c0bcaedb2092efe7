#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use prommongo::config::{ConfigV1, LoggingConfig, MetricsConfig, MongoConfig};
use prommongo::metrics::Metrics;
use prommongo::routes::create_router;
use prommongo::state::AppState;

pub fn test_config() -> ConfigV1 {
    ConfigV1 {
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            app_name: None,
        },
        bind_address: "127.0.0.1:0".to_string(),
        metrics: MetricsConfig::default(),
        logging: LoggingConfig::default(),
    }
}

pub fn build_app(config: ConfigV1) -> (Router, Metrics) {
    let config = Arc::new(config);
    let metrics = Metrics::new(&config.metrics).expect("metrics should register");

    let state = AppState {
        config,
        metrics: metrics.clone(),
    };

    (create_router(state), metrics)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

/// Finds the sample line for `name` in a text exposition and parses its value.
pub fn sample_value(text: &str, name: &str) -> Option<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (metric, value) = line.split_once(' ')?;
            if metric == name {
                value.trim().parse().ok()
            } else {
                None
            }
        })
}
