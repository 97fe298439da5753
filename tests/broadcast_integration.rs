//! Integration tests for the live order-event broadcast.
//!
//! These drive a running hub end to end:
//! 1. Events appended to the log reach every connected subscriber in order
//! 2. A subscriber that cannot keep up is dropped without affecting others
//! 3. Heartbeats flow on the shared timer when no events occur
//! 4. Shutdown closes every subscriber stream
//! 5. Subscribers connecting and leaving during a burst see gap-free,
//!    agreeing runs of the log

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::timeout;

use order_pulse::adapters::broadcast::{
    BroadcastHub, HubConfig, OutboundFrame, SubscriberRegistry, Subscription,
};
use order_pulse::adapters::events::InMemoryEventLog;
use order_pulse::domain::foundation::{OrderId, Timestamp};
use order_pulse::domain::orders::{OrderEvent, OrderEventType, StatusChangedData};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    log: Arc<InMemoryEventLog>,
    hub: Arc<BroadcastHub>,
    shutdown: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl Harness {
    async fn start(queue_capacity: usize, config: HubConfig) -> Self {
        let log = Arc::new(InMemoryEventLog::new(1_000));
        let registry = Arc::new(SubscriberRegistry::new(16, queue_capacity));
        let hub = Arc::new(BroadcastHub::with_config(registry, log.clone(), config));
        let (shutdown, rx) = watch::channel(false);

        let task = {
            let hub = hub.clone();
            tokio::spawn(async move { hub.run(rx).await })
        };
        // Let the hub capture its starting cursor.
        tokio::time::sleep(Duration::from_millis(1)).await;

        Self {
            log,
            hub,
            shutdown,
            task,
        }
    }

    fn status_changed(&self, order: &str, from: &str, to: &str) -> u64 {
        let event = OrderEvent::order_status_changed(
            OrderId::new(order).unwrap(),
            &StatusChangedData {
                previous_status: Some(from.to_string()),
                status: to.to_string(),
            },
            Timestamp::now(),
        )
        .unwrap();
        self.log.append(event).unwrap()
    }
}

async fn next_frame(sub: &mut Subscription) -> OutboundFrame {
    timeout(Duration::from_secs(60), sub.recv())
        .await
        .expect("frame within timeout")
        .expect("subscription open")
}

fn body(frame: &OutboundFrame) -> Value {
    serde_json::from_str(&frame.data).unwrap()
}

fn quick_config() -> HubConfig {
    HubConfig::default().with_write_timeout(Duration::ZERO)
}

// =============================================================================
// Delivery
// =============================================================================

#[tokio::test(start_paused = true)]
async fn status_change_reaches_every_subscriber_before_heartbeat() {
    let harness = Harness::start(8, quick_config()).await;
    let mut subs: Vec<_> = (0..3).map(|_| harness.hub.connect().unwrap()).collect();

    for sub in &mut subs {
        assert_eq!(next_frame(sub).await.event_type, OrderEventType::Connected);
    }

    let sequence = harness.status_changed("ord-7", "pending", "shipped");

    for sub in &mut subs {
        let frame = next_frame(sub).await;
        assert_eq!(frame.event_type, OrderEventType::OrderStatusChanged);
        assert_eq!(frame.sequence, Some(sequence));

        let json = body(&frame);
        assert_eq!(json["type"], "order_status_changed");
        assert_eq!(json["orderId"], "ord-7");
        assert_eq!(json["payload"]["status"], "shipped");
    }
}

#[tokio::test(start_paused = true)]
async fn events_arrive_in_log_order() {
    let harness = Harness::start(8, quick_config()).await;
    let mut sub = harness.hub.connect().unwrap();
    next_frame(&mut sub).await;

    let first = harness.status_changed("ord-1", "pending", "processing");
    let second = harness.status_changed("ord-1", "processing", "shipped");

    assert_eq!(next_frame(&mut sub).await.sequence, Some(first));
    assert_eq!(next_frame(&mut sub).await.sequence, Some(second));
}

#[tokio::test(start_paused = true)]
async fn lagging_subscriber_is_dropped_and_others_continue() {
    let harness = Harness::start(1, quick_config()).await;

    // Never drained: its single slot still holds the connected event.
    let lagging = harness.hub.connect().unwrap();
    let mut healthy = harness.hub.connect().unwrap();
    next_frame(&mut healthy).await;
    assert_eq!(harness.hub.subscriber_count(), 2);

    harness.status_changed("ord-3", "pending", "cancelled");

    let frame = next_frame(&mut healthy).await;
    assert_eq!(frame.event_type, OrderEventType::OrderStatusChanged);
    assert!(!harness.hub.registry().contains(&lagging.id()));
    assert_eq!(harness.hub.subscriber_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn disconnected_subscriber_leaves_registry() {
    let harness = Harness::start(8, quick_config()).await;
    let sub = harness.hub.connect().unwrap();
    assert_eq!(harness.hub.subscriber_count(), 1);

    drop(sub);

    assert_eq!(harness.hub.subscriber_count(), 0);
}

// =============================================================================
// Concurrent churn
// =============================================================================

type Received = Vec<(u64, Arc<str>)>;

/// Collects log frames until `last` arrives or the stream goes quiet.
async fn collect_until(mut sub: Subscription, last: u64) -> Received {
    let mut seen = Vec::new();
    while let Ok(Some(frame)) = timeout(Duration::from_secs(5), sub.recv()).await {
        if let Some(sequence) = frame.sequence {
            seen.push((sequence, frame.data.clone()));
            if sequence == last {
                break;
            }
        }
    }
    seen
}

/// Repeatedly connects, reads a few log frames, and disconnects.
async fn churn(hub: Arc<BroadcastHub>, worker: usize, rounds: usize) -> Vec<Received> {
    let mut runs = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let mut sub = hub.connect().unwrap();
        let budget = 3 + (worker + round) % 7;
        let mut seen = Vec::new();
        while seen.len() < budget {
            match timeout(Duration::from_millis(200), sub.recv()).await {
                Ok(Some(frame)) => {
                    if let Some(sequence) = frame.sequence {
                        seen.push((sequence, frame.data.clone()));
                    }
                }
                _ => break,
            }
        }
        drop(sub);
        runs.push(seen);
        tokio::task::yield_now().await;
    }
    runs
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn churning_subscribers_receive_each_event_once_in_log_order() {
    const EVENTS: u64 = 200;
    let harness = Harness::start(512, HubConfig::default()).await;

    let steady: Vec<_> = (0..3)
        .map(|_| {
            let sub = harness.hub.connect().unwrap();
            tokio::spawn(collect_until(sub, EVENTS))
        })
        .collect();
    let churners: Vec<_> = (0..6)
        .map(|worker| tokio::spawn(churn(harness.hub.clone(), worker, 8)))
        .collect();

    for i in 1..=EVENTS {
        harness.status_changed(&format!("ord-{i}"), "pending", "shipped");
        if i % 10 == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    let mut steady_runs = Vec::new();
    for task in steady {
        steady_runs.push(task.await.unwrap());
    }
    let mut churn_runs = Vec::new();
    for task in churners {
        churn_runs.extend(task.await.unwrap());
    }

    // Connected for the whole burst: every event exactly once, in order.
    let expected: Vec<u64> = (1..=EVENTS).collect();
    for run in &steady_runs {
        let sequences: Vec<u64> = run.iter().map(|(sequence, _)| *sequence).collect();
        assert_eq!(sequences, expected);
    }

    // Partial lifetimes: a contiguous, duplicate-free slice of the log.
    for run in &churn_runs {
        assert!(
            run.windows(2).all(|pair| pair[1].0 == pair[0].0 + 1),
            "gap or duplicate in {:?}",
            run.iter().map(|(sequence, _)| sequence).collect::<Vec<_>>()
        );
    }

    // Every subscriber agrees on what each sequence carried.
    let reference: BTreeMap<u64, Arc<str>> = steady_runs[0].iter().cloned().collect();
    for (sequence, data) in steady_runs.iter().chain(churn_runs.iter()).flatten() {
        assert_eq!(reference.get(sequence), Some(data));
    }
}

// =============================================================================
// Heartbeat and shutdown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn heartbeat_arrives_after_quiet_interval() {
    let harness = Harness::start(8, quick_config()).await;
    let mut sub = harness.hub.connect().unwrap();
    next_frame(&mut sub).await;

    let started = tokio::time::Instant::now();
    let frame = next_frame(&mut sub).await;

    assert_eq!(frame.event_type, OrderEventType::Heartbeat);
    assert_eq!(frame.sequence, None);
    assert!(started.elapsed() >= Duration::from_secs(24));
}

#[tokio::test(start_paused = true)]
async fn shutdown_ends_subscriber_streams() {
    let harness = Harness::start(8, quick_config()).await;
    let mut sub = harness.hub.connect().unwrap();
    next_frame(&mut sub).await;

    harness.shutdown.send(true).unwrap();
    harness.task.await.unwrap();

    assert_eq!(harness.hub.subscriber_count(), 0);
    assert!(sub.recv().await.is_none());
}
