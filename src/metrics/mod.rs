//! Prometheus collectors fed by database client events.
//!
//! Each collector owns its state behind a single read/write lock. Hooks
//! handed out by a collector take the write side for one field update;
//! scrapes take the read side and see every series as of one instant.

mod command;
mod descriptor;
mod pool;
mod recorder;

pub use command::CommandMonitorCollector;
pub use descriptor::{fq_name, DescriptorSet, MetricKind, MetricSpec, DEFAULT_NAMESPACE};
pub use pool::{PoolMonitorCollector, PoolStats};
pub use recorder::Metrics;
