use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use super::mongo::MongoConfig;
use crate::error::Result;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, Debug)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: the monitored deployment, exporter address,
/// metric naming and logging.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigV1 {
    pub mongodb: MongoConfig,
    pub bind_address: String,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Figment reading "config.yaml" from the current directory, overridden by
/// `PROMMONGO_`-prefixed environment variables (`__` separates nested keys).
pub fn default_figment() -> Figment {
    Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("PROMMONGO_").split("__"))
}

/// Load the config from the default figment.
pub fn load_config() -> Result<ConfigV1> {
    extract_config(&default_figment())
}

/// Extract a versioned config from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1> {
    let config = figment.extract::<Config>()?;

    // handle configuration migration between versions here when necessary
    match config {
        Config::ConfigV1(c) => Ok(c),
    }
}
