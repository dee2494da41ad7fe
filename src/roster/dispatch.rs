//! Roster event dispatch.
//!
//! Subscribers are called in subscription order. A `Caller` subscriber runs
//! on whatever thread broadcast the event. An `Affinity` subscriber always
//! runs on the roster's [`AffinityThread`]; when the broadcast comes from
//! another thread, the broadcaster blocks until that subscriber has
//! returned, so no subscriber ever observes a roster that has already moved
//! on to the next mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use super::entry::{EntrySnapshot, RosterEntry};
use super::error::RosterError;
use crate::runtime::affinity::AffinityThread;

/// A roster membership change.
#[derive(Clone, Debug)]
pub enum RosterEvent {
    /// A player was appended; the entry is live.
    Added(RosterEntry),
    /// A player is about to be erased; the snapshot was taken before removal.
    Removed(EntrySnapshot),
}

/// Where a subscriber's callback runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Delivery {
    /// On the broadcasting thread.
    #[default]
    Caller,
    /// On the affinity thread, with the broadcaster waiting for completion.
    Affinity,
}

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

type RosterHandler = Arc<dyn Fn(&RosterEvent) + Send + Sync>;

#[derive(Clone)]
struct Subscription {
    token: SubscriptionToken,
    name: String,
    delivery: Delivery,
    handler: RosterHandler,
}

/// Ordered subscriber list with per-subscriber delivery.
pub struct Dispatcher {
    subscribers: Mutex<Vec<Subscription>>,
    next_token: AtomicU64,
    affinity: Option<Arc<AffinityThread>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.subscribers.lock().iter().map(|s| s.name.clone()).collect();
        f.debug_struct("Dispatcher")
            .field("subscribers", &names)
            .field("affinity", &self.affinity.as_ref().map(|a| a.name().to_string()))
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(affinity: Option<Arc<AffinityThread>>) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(0),
            affinity,
        }
    }

    #[must_use]
    pub fn affinity(&self) -> Option<&Arc<AffinityThread>> {
        self.affinity.as_ref()
    }

    /// Add a subscriber.
    ///
    /// # Errors
    ///
    /// [`RosterError::NoAffinityThread`] when `delivery` is `Affinity` and
    /// there is no affinity thread.
    pub fn subscribe<F>(
        &self,
        name: impl Into<String>,
        delivery: Delivery,
        handler: F,
    ) -> Result<SubscriptionToken, RosterError>
    where
        F: Fn(&RosterEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        if delivery == Delivery::Affinity && self.affinity.is_none() {
            return Err(RosterError::NoAffinityThread { subscriber: name });
        }

        let token = SubscriptionToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        debug!("Roster subscriber '{name}' added ({delivery:?})");
        self.subscribers.lock().push(Subscription {
            token,
            name,
            delivery,
            handler: Arc::new(handler),
        });
        Ok(token)
    }

    /// Remove a subscriber. Returns `false` for an unknown token.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.lock();
        match subscribers.iter().position(|s| s.token == token) {
            Some(pos) => {
                let removed = subscribers.remove(pos);
                debug!("Roster subscriber '{}' removed", removed.name);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver `event` to every current subscriber, in order.
    ///
    /// Must not be called with any roster lock held.
    pub fn dispatch(&self, event: &RosterEvent) {
        let snapshot: Vec<Subscription> = self.subscribers.lock().clone();
        for subscription in snapshot {
            match (subscription.delivery, &self.affinity) {
                (Delivery::Affinity, Some(affinity)) => {
                    let handler = Arc::clone(&subscription.handler);
                    let event = event.clone();
                    affinity.invoke_and_wait(move || handler(&event));
                }
                _ => (subscription.handler)(event),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::PlayerId;
    use std::thread;

    fn added() -> RosterEvent {
        RosterEvent::Added(RosterEntry::new(PlayerId::new("1"), "a", 0))
    }

    #[test]
    fn test_affinity_without_thread_rejected() {
        let dispatcher = Dispatcher::new(None);
        let err = dispatcher
            .subscribe("ui", Delivery::Affinity, |_| {})
            .unwrap_err();
        assert_eq!(
            err,
            RosterError::NoAffinityThread {
                subscriber: "ui".to_string()
            }
        );
    }

    #[test]
    fn test_mixed_delivery_preserves_order() {
        let affinity = Arc::new(AffinityThread::spawn("roster-ui").unwrap());
        let dispatcher = Dispatcher::new(Some(affinity));
        let log = Arc::new(Mutex::new(Vec::new()));

        for (name, delivery) in [
            ("a", Delivery::Caller),
            ("b", Delivery::Affinity),
            ("c", Delivery::Caller),
        ] {
            let log = Arc::clone(&log);
            dispatcher
                .subscribe(
                    name,
                    delivery,
                    move |_| {
                        let thread = thread::current().name().unwrap_or("").to_string();
                        log.lock().push((name, thread));
                    },
                )
                .unwrap();
        }

        dispatcher.dispatch(&added());
        let log = log.lock();
        let names: Vec<_> = log.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(log[1].1, "roster-ui");
        assert_ne!(log[0].1, "roster-ui");
    }

    #[test]
    fn test_unsubscribe() {
        let dispatcher = Dispatcher::new(None);
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let token = dispatcher
            .subscribe("count", Delivery::Caller, move |_| *counter.lock() += 1)
            .unwrap();

        dispatcher.dispatch(&added());
        assert!(dispatcher.unsubscribe(token));
        assert!(!dispatcher.unsubscribe(token));
        dispatcher.dispatch(&added());
        assert_eq!(*hits.lock(), 1);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
