//! Fan-out of notifications to subscriber callbacks.
//!
//! The subscription table is the only state shared between pollers and the
//! application. Callbacks run with no lock held, so a callback may subscribe
//! or unsubscribe (itself included) while it is being invoked.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, warn};

use super::notifications::{Notification, Topic};

/// Callback invoked for every notification published under a subscribed topic.
pub type Handler = Arc<dyn Fn(&Notification) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`Dispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    active: AtomicBool,
    handler: Handler,
}

/// Outcome of one [`Dispatcher::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Routes notifications to the subscribers of each of their topics.
pub struct Dispatcher {
    subscribers: RwLock<HashMap<Topic, Vec<Arc<Subscriber>>>>,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `handler` for `topic`. Handlers for the same topic run in
    /// registration order.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber = Arc::new(Subscriber {
            id,
            active: AtomicBool::new(true),
            handler: Arc::new(handler),
        });
        self.subscribers
            .write()
            .entry(topic)
            .or_default()
            .push(subscriber);
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    ///
    /// Publishes that start after this returns skip the handler, as does the
    /// rest of a publish running on the calling thread. A publish already in
    /// progress on another thread may have passed the check and still invoke
    /// it once.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        for list in subscribers.values_mut() {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                let removed = list.remove(pos);
                removed.active.store(false, Ordering::SeqCst);
                return true;
            }
        }
        false
    }

    /// Number of live subscriptions for `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers
            .read()
            .get(&topic)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Delivers `notification` to every subscriber of each of its topics,
    /// synchronously and in topic order.
    ///
    /// A handler that returns an error or panics is logged and skipped; the
    /// remaining handlers still run.
    pub fn publish(&self, notification: &Notification) -> DispatchReport {
        let mut report = DispatchReport::default();

        for topic in notification.topics() {
            let snapshot: Vec<Arc<Subscriber>> = match self.subscribers.read().get(&topic) {
                Some(list) => list.clone(),
                None => continue,
            };

            for subscriber in snapshot {
                if !subscriber.active.load(Ordering::SeqCst) {
                    continue;
                }

                let handler = &subscriber.handler;
                match catch_unwind(AssertUnwindSafe(|| handler(notification))) {
                    Ok(Ok(())) => report.delivered += 1,
                    Ok(Err(e)) => {
                        report.failed += 1;
                        warn!(
                            "Subscriber {:?} on {:?} failed: {:#}",
                            subscriber.id, topic, e
                        );
                    }
                    Err(panic) => {
                        report.failed += 1;
                        error!(
                            "Subscriber {:?} on {:?} panicked: {}",
                            subscriber.id,
                            topic,
                            panic_message(panic.as_ref())
                        );
                    }
                }
            }
        }

        report
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.subscribers.read();
        f.debug_struct("Dispatcher")
            .field("topics", &subscribers.len())
            .field(
                "subscriptions",
                &subscribers.values().map(|l| l.len()).sum::<usize>(),
            )
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
