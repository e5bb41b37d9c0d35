//! BroadcastHub - live subscriber set with catch-up on connect.
//!
//! Fan-out is best-effort: each subscriber has its own unbounded channel, a
//! send only fails once the receiving transport task is gone, and a failed
//! send removes exactly that subscriber. Producers are never throttled by a
//! slow consumer.

use std::sync::{Arc, Mutex};

use contracts::Record;
use slab::Slab;
use source_store::RelayStore;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::metrics::HubMetrics;

/// Key identifying one live subscriber.
pub type SubscriberId = usize;

/// A registered subscriber's receiving end.
///
/// Dropping the subscription (or its transport task) closes the channel; the
/// hub notices on the next publish and removes the sender.
pub struct Subscription {
    /// Slab key, needed for explicit unsubscribe
    pub id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Record>,
}

impl Subscription {
    /// Receive the next record (catch-up burst first, then live records).
    pub async fn recv(&mut self) -> Option<Record> {
        self.rx.recv().await
    }

    /// Non-blocking receive, for tests and drain loops.
    pub fn try_recv(&mut self) -> Option<Record> {
        self.rx.try_recv().ok()
    }
}

/// Fan-out hub over the live subscriber set.
pub struct BroadcastHub {
    store: Arc<RelayStore>,
    subscribers: Mutex<Slab<mpsc::UnboundedSender<Record>>>,
    metrics: Arc<HubMetrics>,
}

impl BroadcastHub {
    /// Create a hub that serves catch-up snapshots from `store`.
    pub fn new(store: Arc<RelayStore>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(Slab::new()),
            metrics: Arc::new(HubMetrics::new()),
        }
    }

    /// Register a new live subscriber.
    ///
    /// The current `latest` of every known source is queued first, ascending
    /// by source id, so the subscriber sees a complete snapshot before any
    /// live record.
    #[instrument(name = "hub_subscribe", skip(self))]
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();

        let catch_up = self.store.latest_all();
        self.metrics.add_catch_up(catch_up.len() as u64);
        for record in catch_up {
            // Cannot fail: we still hold the receiver
            let _ = tx.send(record);
        }

        let id = {
            let mut subscribers = self.subscribers.lock().expect("subscriber set lock poisoned");
            let id = subscribers.insert(tx);
            self.metrics.set_subscriber_count(subscribers.len());
            observability::record_subscriber_count(subscribers.len());
            id
        };

        debug!(subscriber = id, "Subscriber connected");
        Subscription { id, rx }
    }

    /// Remove a subscriber. Idempotent: unknown ids are ignored.
    #[instrument(name = "hub_unsubscribe", skip(self))]
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.lock().expect("subscriber set lock poisoned");
        if subscribers.try_remove(id).is_some() {
            self.metrics.set_subscriber_count(subscribers.len());
            observability::record_subscriber_count(subscribers.len());
            debug!(subscriber = id, "Subscriber removed");
        }
    }

    /// Push a record to every live subscriber.
    ///
    /// Subscribers whose channel is closed are removed from the set, not
    /// retried; the others are unaffected.
    pub fn publish(&self, record: &Record) {
        let mut subscribers = self.subscribers.lock().expect("subscriber set lock poisoned");

        let dead: Vec<SubscriberId> = subscribers
            .iter()
            .filter_map(|(id, tx)| tx.send(record.clone()).is_err().then_some(id))
            .collect();

        for id in &dead {
            subscribers.remove(*id);
            debug!(subscriber = id, "Subscriber dropped during publish");
        }

        if !dead.is_empty() {
            self.metrics.add_removed(dead.len() as u64);
            self.metrics.set_subscriber_count(subscribers.len());
        }
        self.metrics.inc_published_count();
        observability::record_broadcast(subscribers.len());
    }

    /// Currently connected subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber set lock poisoned")
            .len()
    }

    /// Hub metrics handle.
    pub fn metrics(&self) -> &Arc<HubMetrics> {
        &self.metrics
    }
}
