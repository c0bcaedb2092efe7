//! Bridges the MongoDB driver's event handlers to the crate's monitors.
//!
//! Driver events are converted into the driver-independent types from
//! [`crate::monitor`]. Any handler already installed on the client options is
//! kept as an upstream and receives the raw driver event before the monitor.

use std::sync::Arc;

use mongodb::event::cmap::{
    CmapEventHandler, ConnectionCheckedInEvent, ConnectionCheckedOutEvent,
    ConnectionCheckoutFailedEvent, ConnectionCheckoutStartedEvent, ConnectionClosedEvent,
    ConnectionCreatedEvent, ConnectionPoolOptions, ConnectionReadyEvent, PoolClearedEvent,
    PoolClosedEvent, PoolCreatedEvent, PoolReadyEvent,
};
use mongodb::event::command::{self as driver_command, CommandEventHandler};
use mongodb::options::ClientOptions;
use tracing::{debug, info};

use crate::metrics::Metrics;
use crate::monitor::{
    CommandFailedEvent, CommandMonitor, CommandStartedEvent, CommandSucceededEvent, PoolEvent,
    PoolEventKind, PoolMonitor, PoolOptions,
};

/// Pool size the driver uses when `maxPoolSize` is not set.
pub const DRIVER_DEFAULT_MAX_POOL_SIZE: u64 = 10;

/// Pool configuration as the driver applies it, filling in driver defaults.
///
/// The 2.x driver has no wait queue timeout setting, so it is always 0.
pub fn effective_pool_options(max_pool_size: Option<u32>, min_pool_size: Option<u32>) -> PoolOptions {
    PoolOptions {
        max_pool_size: max_pool_size.map_or(DRIVER_DEFAULT_MAX_POOL_SIZE, u64::from),
        min_pool_size: min_pool_size.map_or(0, u64::from),
        wait_queue_timeout_ms: 0,
    }
}

impl From<&ConnectionPoolOptions> for PoolOptions {
    fn from(options: &ConnectionPoolOptions) -> Self {
        effective_pool_options(options.max_pool_size, options.min_pool_size)
    }
}

/// Driver command handler forwarding to a [`CommandMonitor`].
pub struct DriverCommandHandler {
    monitor: Arc<dyn CommandMonitor>,
    upstream: Option<Arc<dyn CommandEventHandler>>,
}

impl DriverCommandHandler {
    pub fn new(
        monitor: Arc<dyn CommandMonitor>,
        upstream: Option<Arc<dyn CommandEventHandler>>,
    ) -> Self {
        DriverCommandHandler { monitor, upstream }
    }
}

impl CommandEventHandler for DriverCommandHandler {
    fn handle_command_started_event(&self, event: driver_command::CommandStartedEvent) {
        let converted = CommandStartedEvent {
            command_name: event.command_name.clone(),
            database: event.db.clone(),
            request_id: event.request_id,
        };
        if let Some(upstream) = &self.upstream {
            upstream.handle_command_started_event(event);
        }
        self.monitor.started(&converted);
    }

    fn handle_command_succeeded_event(&self, event: driver_command::CommandSucceededEvent) {
        let converted = CommandSucceededEvent {
            command_name: event.command_name.clone(),
            request_id: event.request_id,
            duration: event.duration,
        };
        if let Some(upstream) = &self.upstream {
            upstream.handle_command_succeeded_event(event);
        }
        self.monitor.succeeded(&converted);
    }

    fn handle_command_failed_event(&self, event: driver_command::CommandFailedEvent) {
        let converted = CommandFailedEvent {
            command_name: event.command_name.clone(),
            request_id: event.request_id,
            duration: event.duration,
            failure: event.failure.to_string(),
        };
        if let Some(upstream) = &self.upstream {
            upstream.handle_command_failed_event(event);
        }
        self.monitor.failed(&converted);
    }
}

/// Driver CMAP handler forwarding to a [`PoolMonitor`].
pub struct DriverPoolHandler {
    monitor: Arc<dyn PoolMonitor>,
    upstream: Option<Arc<dyn CmapEventHandler>>,
}

impl DriverPoolHandler {
    pub fn new(monitor: Arc<dyn PoolMonitor>, upstream: Option<Arc<dyn CmapEventHandler>>) -> Self {
        DriverPoolHandler { monitor, upstream }
    }

    fn dispatch<E>(&self, event: E, converted: PoolEvent, forward: fn(&dyn CmapEventHandler, E)) {
        if let Some(upstream) = &self.upstream {
            forward(upstream.as_ref(), event);
        }
        self.monitor.event(&converted);
    }
}

impl CmapEventHandler for DriverPoolHandler {
    fn handle_pool_created_event(&self, event: PoolCreatedEvent) {
        let mut converted = PoolEvent::new(PoolEventKind::PoolCreated);
        if let Some(options) = &event.options {
            converted = converted.with_options(options.into());
        }
        debug!(address = %event.address, "Connection pool created");
        self.dispatch(event, converted, |h, e| h.handle_pool_created_event(e));
    }

    fn handle_pool_ready_event(&self, event: PoolReadyEvent) {
        let converted = PoolEvent::new(PoolEventKind::PoolReady);
        self.dispatch(event, converted, |h, e| h.handle_pool_ready_event(e));
    }

    fn handle_pool_cleared_event(&self, event: PoolClearedEvent) {
        debug!(address = %event.address, "Connection pool cleared");
        let converted = PoolEvent::new(PoolEventKind::PoolCleared);
        self.dispatch(event, converted, |h, e| h.handle_pool_cleared_event(e));
    }

    fn handle_pool_closed_event(&self, event: PoolClosedEvent) {
        debug!(address = %event.address, "Connection pool closed");
        let converted = PoolEvent::new(PoolEventKind::PoolClosed);
        self.dispatch(event, converted, |h, e| h.handle_pool_closed_event(e));
    }

    fn handle_connection_created_event(&self, event: ConnectionCreatedEvent) {
        let converted = PoolEvent::new(PoolEventKind::ConnectionCreated);
        self.dispatch(event, converted, |h, e| h.handle_connection_created_event(e));
    }

    fn handle_connection_ready_event(&self, event: ConnectionReadyEvent) {
        let converted = PoolEvent::new(PoolEventKind::ConnectionReady);
        self.dispatch(event, converted, |h, e| h.handle_connection_ready_event(e));
    }

    fn handle_connection_closed_event(&self, event: ConnectionClosedEvent) {
        let converted = PoolEvent::new(PoolEventKind::ConnectionClosed);
        self.dispatch(event, converted, |h, e| h.handle_connection_closed_event(e));
    }

    fn handle_connection_checkout_started_event(&self, event: ConnectionCheckoutStartedEvent) {
        let converted = PoolEvent::new(PoolEventKind::CheckoutStarted);
        self.dispatch(event, converted, |h, e| {
            h.handle_connection_checkout_started_event(e)
        });
    }

    fn handle_connection_checkout_failed_event(&self, event: ConnectionCheckoutFailedEvent) {
        let converted = PoolEvent::new(PoolEventKind::CheckoutFailed);
        self.dispatch(event, converted, |h, e| {
            h.handle_connection_checkout_failed_event(e)
        });
    }

    fn handle_connection_checked_out_event(&self, event: ConnectionCheckedOutEvent) {
        let converted = PoolEvent::new(PoolEventKind::CheckoutSucceeded);
        self.dispatch(event, converted, |h, e| {
            h.handle_connection_checked_out_event(e)
        });
    }

    fn handle_connection_checked_in_event(&self, event: ConnectionCheckedInEvent) {
        let converted = PoolEvent::new(PoolEventKind::ConnectionReturned);
        self.dispatch(event, converted, |h, e| h.handle_connection_checked_in_event(e));
    }
}

/// Attaches the command and pool collectors of `metrics` to client options.
///
/// Handlers already present on `options` stay in the chain and are called
/// before the collectors.
pub fn instrument(options: &mut ClientOptions, metrics: &Metrics) {
    let command_upstream = options.command_event_handler.take();
    let cmap_upstream = options.cmap_event_handler.take();
    info!(
        chained_command_handler = command_upstream.is_some(),
        chained_cmap_handler = cmap_upstream.is_some(),
        "Attaching MongoDB metrics collectors"
    );

    let command = metrics.command_collector().command_monitor(None);
    options.command_event_handler = Some(Arc::new(DriverCommandHandler::new(
        command,
        command_upstream,
    )));

    let pool = metrics.pool_collector().pool_monitor(None);
    options.cmap_event_handler = Some(Arc::new(DriverPoolHandler::new(pool, cmap_upstream)));
}
