//! Driver-independent event payloads delivered to monitors.

use std::time::Duration;

/// A command was sent to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandStartedEvent {
    pub command_name: String,
    pub database: String,
    pub request_id: i32,
}

/// A command completed successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSucceededEvent {
    pub command_name: String,
    pub request_id: i32,
    pub duration: Duration,
}

/// A command completed with an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFailedEvent {
    pub command_name: String,
    pub request_id: i32,
    pub duration: Duration,
    pub failure: String,
}

/// The kinds of connection pool lifecycle events a driver reports.
///
/// Only eight of these are counted; the rest (`PoolReady`, `ConnectionReady`,
/// `CheckoutStarted`) pass through monitors without touching any series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PoolEventKind {
    ConnectionClosed,
    PoolCreated,
    ConnectionCreated,
    CheckoutFailed,
    CheckoutSucceeded,
    ConnectionReturned,
    PoolCleared,
    PoolClosed,
    PoolReady,
    ConnectionReady,
    CheckoutStarted,
}

/// Pool configuration carried by some pool events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_pool_size: u64,
    pub min_pool_size: u64,
    pub wait_queue_timeout_ms: u64,
}

/// One connection pool lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolEvent {
    pub kind: PoolEventKind,
    pub options: Option<PoolOptions>,
}

impl PoolEvent {
    /// An event of the given kind without pool configuration.
    pub fn new(kind: PoolEventKind) -> Self {
        PoolEvent {
            kind,
            options: None,
        }
    }

    /// Attaches a pool configuration payload.
    pub fn with_options(mut self, options: PoolOptions) -> Self {
        self.options = Some(options);
        self
    }
}
