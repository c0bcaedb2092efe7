use std::sync::Arc;

use super::events::{CommandFailedEvent, CommandStartedEvent, CommandSucceededEvent, PoolEvent};

/// Receives command lifecycle notifications.
///
/// All methods default to doing nothing, so implementors only override the
/// entry points they care about.
pub trait CommandMonitor: Send + Sync {
    /// Called before a command is sent.
    fn started(&self, _event: &CommandStartedEvent) {}

    /// Called when a command completes successfully.
    fn succeeded(&self, _event: &CommandSucceededEvent) {}

    /// Called when a command completes with an error.
    fn failed(&self, _event: &CommandFailedEvent) {}
}

/// Receives connection pool lifecycle notifications.
pub trait PoolMonitor: Send + Sync {
    /// Called for every pool event, counted kind or not.
    fn event(&self, event: &PoolEvent);
}

impl<T: CommandMonitor + ?Sized> CommandMonitor for Arc<T> {
    fn started(&self, event: &CommandStartedEvent) {
        (**self).started(event)
    }

    fn succeeded(&self, event: &CommandSucceededEvent) {
        (**self).succeeded(event)
    }

    fn failed(&self, event: &CommandFailedEvent) {
        (**self).failed(event)
    }
}

impl<T: PoolMonitor + ?Sized> PoolMonitor for Arc<T> {
    fn event(&self, event: &PoolEvent) {
        (**self).event(event)
    }
}
