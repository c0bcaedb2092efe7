//! Connection pool lifecycle collector.

use std::sync::Arc;

use parking_lot::RwLock;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use tracing::{debug, trace};

use super::descriptor::{DescriptorSet, MetricKind, MetricSpec, DEFAULT_NAMESPACE};
use crate::monitor::{PoolEvent, PoolEventKind, PoolMonitor, PoolOptions};

const COUNTER_COUNT: usize = 8;

// Counters first, in the order of `counter_index`, then the three gauges.
const POOL_METRICS: [MetricSpec; COUNTER_COUNT + 3] = [
    MetricSpec {
        name: "connection_closed",
        help: "The total number of closed connection events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "pool_created",
        help: "The total number of pool created events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "connection_created",
        help: "The total number of connection created events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "get_failed",
        help: "The total number of connection checkout failed events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "get_succeeded",
        help: "The total number of connection checkedout events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "connection_returnd",
        help: "The total number of connection checkedin events.",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "pool_cleared",
        help: "The total number of connection pool cleared events",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "pool_closed",
        help: "The total number of connection pool closed events",
        kind: MetricKind::Counter,
    },
    MetricSpec {
        name: "max_pool_size",
        help: "The maximum number of connections allowed in the driver's connection pool to each server.",
        kind: MetricKind::Gauge,
    },
    MetricSpec {
        name: "min_pool_size",
        help: "The minimum number of connections allowed in the driver's connection pool to each server.",
        kind: MetricKind::Gauge,
    },
    MetricSpec {
        name: "wait_queue_timeout_ms",
        help: "The maximum amount of time a thread can wait for a connection to become available.",
        kind: MetricKind::Gauge,
    },
];

/// Position of the counter a pool event kind increments, if any.
fn counter_index(kind: PoolEventKind) -> Option<usize> {
    match kind {
        PoolEventKind::ConnectionClosed => Some(0),
        PoolEventKind::PoolCreated => Some(1),
        PoolEventKind::ConnectionCreated => Some(2),
        PoolEventKind::CheckoutFailed => Some(3),
        PoolEventKind::CheckoutSucceeded => Some(4),
        PoolEventKind::ConnectionReturned => Some(5),
        PoolEventKind::PoolCleared => Some(6),
        PoolEventKind::PoolClosed => Some(7),
        _ => None,
    }
}

/// A consistent view of every pool series at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub connection_closed: u64,
    pub pool_created: u64,
    pub connection_created: u64,
    pub get_failed: u64,
    pub get_succeeded: u64,
    pub connection_returned: u64,
    pub pool_cleared: u64,
    pub pool_closed: u64,
    pub max_pool_size: u64,
    pub min_pool_size: u64,
    pub wait_queue_timeout_ms: u64,
}

#[derive(Debug, Default)]
struct PoolState {
    counters: [u64; COUNTER_COUNT],
    options: PoolOptions,
}

impl PoolState {
    /// Applies one event; returns true when it changed the pool configuration.
    fn apply(&mut self, event: &PoolEvent) -> bool {
        if let Some(idx) = counter_index(event.kind) {
            self.counters[idx] += 1;
        }

        match event.options {
            Some(options) if options != self.options => {
                self.options = options;
                true
            }
            _ => false,
        }
    }

    fn values(&self) -> [u64; COUNTER_COUNT + 3] {
        let mut values = [0; COUNTER_COUNT + 3];
        values[..COUNTER_COUNT].copy_from_slice(&self.counters);
        values[COUNTER_COUNT] = self.options.max_pool_size;
        values[COUNTER_COUNT + 1] = self.options.min_pool_size;
        values[COUNTER_COUNT + 2] = self.options.wait_queue_timeout_ms;
        values
    }

    fn stats(&self) -> PoolStats {
        let [
            connection_closed,
            pool_created,
            connection_created,
            get_failed,
            get_succeeded,
            connection_returned,
            pool_cleared,
            pool_closed,
        ] = self.counters;
        PoolStats {
            connection_closed,
            pool_created,
            connection_created,
            get_failed,
            get_succeeded,
            connection_returned,
            pool_cleared,
            pool_closed,
            max_pool_size: self.options.max_pool_size,
            min_pool_size: self.options.min_pool_size,
            wait_queue_timeout_ms: self.options.wait_queue_timeout_ms,
        }
    }
}

/// Counts connection pool lifecycle events and exposes the last observed
/// pool configuration.
#[derive(Clone, Debug)]
pub struct PoolMonitorCollector {
    state: Arc<RwLock<PoolState>>,
    descs: DescriptorSet,
}

impl PoolMonitorCollector {
    /// Creates a collector using the default `go_mongo` namespace.
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE).expect("default pool metric names are valid")
    }

    /// Creates a collector whose series are prefixed with `namespace`.
    pub fn with_namespace(namespace: &str) -> prometheus::Result<Self> {
        Ok(PoolMonitorCollector {
            state: Arc::new(RwLock::new(PoolState::default())),
            descs: DescriptorSet::new(namespace, &POOL_METRICS)?,
        })
    }

    /// Wraps `parent` in a monitor that also updates the pool series.
    ///
    /// The parent is always invoked first. Passing `None` yields a monitor
    /// that only records.
    pub fn pool_monitor(&self, parent: Option<Arc<dyn PoolMonitor>>) -> Arc<dyn PoolMonitor> {
        Arc::new(PoolHook {
            parent,
            state: self.state.clone(),
        })
    }

    /// Reads every counter and gauge under one lock acquisition.
    pub fn snapshot(&self) -> PoolStats {
        self.state.read().stats()
    }
}

impl Default for PoolMonitorCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for PoolMonitorCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let values = self.state.read().values();
        self.descs.families(&values)
    }
}

struct PoolHook {
    parent: Option<Arc<dyn PoolMonitor>>,
    state: Arc<RwLock<PoolState>>,
}

impl PoolMonitor for PoolHook {
    fn event(&self, event: &PoolEvent) {
        if let Some(parent) = &self.parent {
            parent.event(event);
        }

        let reconfigured = self.state.write().apply(event);

        if counter_index(event.kind).is_none() {
            trace!(kind = ?event.kind, "Ignoring uncounted pool event");
        }
        if let (true, Some(options)) = (reconfigured, event.options) {
            debug!(
                max_pool_size = options.max_pool_size,
                min_pool_size = options.min_pool_size,
                wait_queue_timeout_ms = options.wait_queue_timeout_ms,
                "Pool configuration observed"
            );
        }
    }
}
