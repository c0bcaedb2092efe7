use serde::{Deserialize, Serialize};

/// The config struct for the monitored MongoDB deployment.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    /// Application name reported to the server; defaults to "prommongo".
    #[serde(default)]
    pub app_name: Option<String>,
}
