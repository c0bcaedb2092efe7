use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mongodb::bson::doc;
use mongodb::event::cmap::{CmapEventHandler, PoolCreatedEvent};
use mongodb::options::ClientOptions;
use mongodb::Client;
use prommongo::config::MetricsConfig;
use prommongo::driver::instrument;
use prommongo::metrics::{Metrics, PoolMonitorCollector};

// Nothing listens on port 1; server selection gives up quickly.
const UNREACHABLE_URI: &str =
    "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=300&maxPoolSize=33&minPoolSize=0";

/// Counts pool-created events and records what the collector had seen
/// at the moment this handler was called.
struct CountingCmapHandler {
    collector: PoolMonitorCollector,
    pool_created: AtomicU64,
    collector_pool_created_at_call: AtomicU64,
}

impl CmapEventHandler for CountingCmapHandler {
    fn handle_pool_created_event(&self, _event: PoolCreatedEvent) {
        self.collector_pool_created_at_call
            .store(self.collector.snapshot().pool_created, Ordering::SeqCst);
        self.pool_created.fetch_add(1, Ordering::SeqCst);
    }
}

async fn instrumented_client(metrics: &Metrics, options: &mut ClientOptions) -> Client {
    instrument(options, metrics);
    let client = Client::with_options(options.clone()).expect("client should build");

    // Drives server selection so the pool is created before we look.
    let ping = client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await;
    assert!(ping.is_err(), "nothing should answer on port 1");

    client
}

#[tokio::test]
async fn pool_created_flows_through_upstream_then_collector() {
    let metrics = Metrics::new(&MetricsConfig::default()).unwrap();
    let upstream = Arc::new(CountingCmapHandler {
        collector: metrics.pool_collector().clone(),
        pool_created: AtomicU64::new(0),
        collector_pool_created_at_call: AtomicU64::new(u64::MAX),
    });

    let mut options = ClientOptions::parse(UNREACHABLE_URI).await.unwrap();
    options.cmap_event_handler = Some(upstream.clone());
    let _client = instrumented_client(&metrics, &mut options).await;

    let stats = metrics.pool_collector().snapshot();
    assert_eq!(stats.pool_created, 1);
    assert_eq!(stats.max_pool_size, 33);
    assert_eq!(stats.min_pool_size, 0);
    assert_eq!(stats.wait_queue_timeout_ms, 0);
    // No connection could ever be checked out or returned.
    assert_eq!(stats.get_succeeded, 0);
    assert_eq!(stats.connection_returned, 0);

    assert_eq!(upstream.pool_created.load(Ordering::SeqCst), 1);
    // The upstream handler ran before the collector counted the event.
    assert_eq!(
        upstream.collector_pool_created_at_call.load(Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn driver_pool_configuration_is_rendered() {
    let metrics = Metrics::new(&MetricsConfig::default()).unwrap();
    let mut options = ClientOptions::parse(UNREACHABLE_URI).await.unwrap();
    let _client = instrumented_client(&metrics, &mut options).await;

    let text = metrics.render().unwrap();
    assert!(text.contains("go_mongo_pool_created 1"));
    assert!(text.contains("go_mongo_max_pool_size 33"));
    // A failed ping never produces a command event.
    assert!(text.contains("go_mongo_command_duration_ns 0"));
}
