use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use prometheus::core::Collector;
use prommongo::metrics::{CommandMonitorCollector, PoolMonitorCollector};
use prommongo::monitor::{
    CommandMonitor, CommandSucceededEvent, PoolEvent, PoolEventKind, PoolMonitor,
};

fn counter(collector: &PoolMonitorCollector, name: &str) -> f64 {
    collector
        .collect()
        .iter()
        .find(|mf| mf.get_name() == name)
        .map(|mf| mf.get_metric()[0].get_counter().get_value())
        .expect("series should be emitted")
}

#[derive(Default)]
struct CountingMonitor {
    seen: AtomicU64,
}

impl PoolMonitor for CountingMonitor {
    fn event(&self, _event: &PoolEvent) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn concurrent_checkouts_are_all_counted() {
    let collector = PoolMonitorCollector::new();
    let monitor = collector.pool_monitor(None);

    thread::scope(|s| {
        for _ in 0..100 {
            let monitor = monitor.clone();
            s.spawn(move || monitor.event(&PoolEvent::new(PoolEventKind::CheckoutSucceeded)));
        }
    });

    assert_eq!(counter(&collector, "go_mongo_get_succeeded"), 100.0);
}

#[test]
fn interleaved_kinds_keep_exact_counts() {
    let parent = Arc::new(CountingMonitor::default());
    let collector = PoolMonitorCollector::new();
    let monitor = collector.pool_monitor(Some(parent.clone()));

    let kinds = [
        PoolEventKind::CheckoutSucceeded,
        PoolEventKind::ConnectionReturned,
        PoolEventKind::ConnectionReady,
        PoolEventKind::CheckoutStarted,
    ];

    thread::scope(|s| {
        for worker in 0..8 {
            let monitor = monitor.clone();
            s.spawn(move || {
                for i in 0..250 {
                    monitor.event(&PoolEvent::new(kinds[(worker + i) % kinds.len()]));
                }
            });
        }
        // Scrapes run alongside the writers.
        for _ in 0..4 {
            let collector = collector.clone();
            s.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(collector.collect().len(), 11);
                }
            });
        }
    });

    let stats = collector.snapshot();
    assert_eq!(stats.get_succeeded, 500);
    assert_eq!(stats.connection_returned, 500);
    assert_eq!(parent.seen.load(Ordering::SeqCst), 2000);
}

#[test]
fn concurrent_commands_leave_a_recorded_duration() {
    let collector = CommandMonitorCollector::new();
    let monitor = collector.command_monitor(None);

    thread::scope(|s| {
        for i in 1..=50u64 {
            let monitor = monitor.clone();
            s.spawn(move || {
                monitor.succeeded(&CommandSucceededEvent {
                    command_name: "find".to_string(),
                    request_id: i as i32,
                    duration: Duration::from_nanos(i * 1000),
                })
            });
        }
    });

    let last = collector.last_duration_nanos();
    assert!(last >= 1000 && last <= 50_000 && last % 1000 == 0);

    monitor.succeeded(&CommandSucceededEvent {
        command_name: "find".to_string(),
        request_id: 51,
        duration: Duration::from_nanos(3),
    });
    assert_eq!(collector.last_duration_nanos(), 3);
}
