//! Registry wiring for the MongoDB collectors.

use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

use super::command::CommandMonitorCollector;
use super::pool::PoolMonitorCollector;
use crate::config::MetricsConfig;
use crate::error::Result;

/// Prometheus registry holding one command and one pool collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    command: CommandMonitorCollector,
    pool: PoolMonitorCollector,
}

impl Metrics {
    /// Builds both collectors under the configured namespace and registers
    /// them with a fresh registry.
    pub fn new(config: &MetricsConfig) -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let command = CommandMonitorCollector::with_namespace(&config.namespace)?;
        registry.register(Box::new(command.clone()))?;

        let pool = PoolMonitorCollector::with_namespace(&config.namespace)?;
        registry.register(Box::new(pool.clone()))?;

        Ok(Metrics {
            registry,
            command,
            pool,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn command_collector(&self) -> &CommandMonitorCollector {
        &self.command
    }

    pub fn pool_collector(&self) -> &PoolMonitorCollector {
        &self.pool
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
