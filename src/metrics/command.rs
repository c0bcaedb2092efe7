//! Command latency collector.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;

use super::descriptor::{DescriptorSet, MetricKind, MetricSpec, DEFAULT_NAMESPACE};
use crate::monitor::{CommandFailedEvent, CommandMonitor, CommandStartedEvent, CommandSucceededEvent};

const COMMAND_METRICS: [MetricSpec; 1] = [MetricSpec {
    name: "command_duration_ns",
    help: "Elapsed time of command.",
    kind: MetricKind::Gauge,
}];

#[derive(Debug, Default)]
struct CommandStats {
    last_duration_ns: u64,
}

/// Exposes the duration of the most recently finished command as a gauge.
///
/// Only the latest value is kept; durations finishing between two scrapes
/// overwrite each other.
#[derive(Clone, Debug)]
pub struct CommandMonitorCollector {
    stats: Arc<RwLock<CommandStats>>,
    descs: DescriptorSet,
}

impl CommandMonitorCollector {
    /// Creates a collector using the default `go_mongo` namespace.
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE).expect("default command metric names are valid")
    }

    /// Creates a collector whose series are prefixed with `namespace`.
    pub fn with_namespace(namespace: &str) -> prometheus::Result<Self> {
        Ok(CommandMonitorCollector {
            stats: Arc::new(RwLock::new(CommandStats::default())),
            descs: DescriptorSet::new(namespace, &COMMAND_METRICS)?,
        })
    }

    /// Wraps `parent` in a monitor that also records command durations.
    ///
    /// The parent is always invoked first. Passing `None` yields a monitor
    /// that only records.
    pub fn command_monitor(
        &self,
        parent: Option<Arc<dyn CommandMonitor>>,
    ) -> Arc<dyn CommandMonitor> {
        Arc::new(CommandHook {
            parent,
            stats: self.stats.clone(),
        })
    }

    /// The last recorded command duration in nanoseconds.
    pub fn last_duration_nanos(&self) -> u64 {
        self.stats.read().last_duration_ns
    }
}

impl Default for CommandMonitorCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for CommandMonitorCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let stats = self.stats.read();
        self.descs.families(&[stats.last_duration_ns])
    }
}

struct CommandHook {
    parent: Option<Arc<dyn CommandMonitor>>,
    stats: Arc<RwLock<CommandStats>>,
}

impl CommandHook {
    fn record(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.stats.write().last_duration_ns = nanos;
    }
}

impl CommandMonitor for CommandHook {
    fn started(&self, event: &CommandStartedEvent) {
        if let Some(parent) = &self.parent {
            parent.started(event);
        }
    }

    fn succeeded(&self, event: &CommandSucceededEvent) {
        if let Some(parent) = &self.parent {
            parent.succeeded(event);
        }
        self.record(event.duration);
    }

    fn failed(&self, event: &CommandFailedEvent) {
        if let Some(parent) = &self.parent {
            parent.failed(event);
        }
        self.record(event.duration);
    }
}
