use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_NAMESPACE;

/// Naming for the exported series.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Prefix joined to every series name with an underscore.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            namespace: default_namespace(),
        }
    }
}
