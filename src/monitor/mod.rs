//! Event hooks that database clients call into.
//!
//! Collectors hand out implementations of [`CommandMonitor`] and
//! [`PoolMonitor`]; the `driver` module bridges these to the MongoDB driver.

mod events;
mod hooks;

pub use events::{
    CommandFailedEvent, CommandStartedEvent, CommandSucceededEvent, PoolEvent, PoolEventKind,
    PoolOptions,
};
pub use hooks::{CommandMonitor, PoolMonitor};
