//! Library exports for prommongo, shared between the binary and tests.
//!
//! Exposes MongoDB driver command and connection pool events as Prometheus
//! metrics through two collectors, [`metrics::CommandMonitorCollector`] and
//! [`metrics::PoolMonitorCollector`].

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;

pub use error::{Error, Result};
