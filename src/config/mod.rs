// Re-exports so callers can "use crate::config::*".
pub mod config;
pub mod logging;
pub mod metrics;
pub mod mongo;

pub use config::*;
pub use logging::*;
pub use metrics::*;
pub use mongo::*;
