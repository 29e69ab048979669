//! Event bus: append-only event log with live fan-out.
//!
//! The bus decouples the simulation from whoever watches it (renderers, log
//! viewers, replay tools, bots). Every published [`GameEvent`] is serialized
//! to one JSON line and appended to the log, then handed to each subscriber
//! in registration order.
//!
//! # Ownership
//!
//! An `EventBus` is a cheap handle around shared state; cloning it yields
//! another handle to the *same* log. Each game session constructs its own bus
//! and passes clones to the engine and to subscribers, so concurrent games
//! never see each other's events.
//!
//! # Reentrancy
//!
//! Appends are serialized by an internal mutex, and the log order is the
//! publish order. Subscribers run after the lock is released, so a subscriber
//! may publish without deadlocking; guarding against unbounded recursion is
//! that subscriber's job.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use delve_core::bus::EventBus;
//! use delve_core::entity::EntityId;
//! use delve_core::event::GameEvent;
//!
//! let bus = EventBus::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let sub = bus.subscribe(move |event| sink.lock().unwrap().push(event.tick()));
//!
//! bus.publish(&GameEvent::Wait { tick: 1, entity: EntityId::new(0) });
//! sub.unsubscribe();
//! bus.publish(&GameEvent::Wait { tick: 2, entity: EntityId::new(0) });
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! assert_eq!(bus.lines().len(), 2);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::warn;

use crate::event::GameEvent;

type Callback = Arc<dyn Fn(&GameEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    lines: Vec<String>,
    subscribers: Vec<(u64, Callback)>,
    next_subscriber: u64,
}

fn lock(inner: &Mutex<BusInner>) -> MutexGuard<'_, BusInner> {
    // The log is append-only, so a poisoned guard still holds a valid prefix.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to an event log and its subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("EventBus")
            .field("lines", &inner.lines.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl EventBus {
    /// Creates an empty bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event` to the log and delivers it to every subscriber.
    ///
    /// Subscribers are invoked synchronously, in registration order, with the
    /// set registered at the moment of the call.
    pub fn publish(&self, event: &GameEvent) {
        let subscribers: Vec<Callback> = {
            let mut inner = lock(&self.inner);
            match event.to_line() {
                Ok(line) => inner.lines.push(line),
                Err(err) => warn!(kind = %event.kind(), %err, "event could not be serialized"),
            }
            inner
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        for callback in &subscribers {
            callback(event);
        }
    }

    /// Registers a live subscriber. The returned [`Subscription`] removes it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Snapshot copy of the serialized log, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        lock(&self.inner).lines.clone()
    }

    /// Number of logged events.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).lines.len()
    }

    /// True if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).lines.is_empty()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// The log as newline-delimited JSON, one event per line.
    #[must_use]
    pub fn export_ndjson(&self) -> String {
        let inner = lock(&self.inner);
        let mut out = String::new();
        for line in &inner.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Feeds every logged event to `handler`, oldest first.
    ///
    /// Lets a late subscriber catch up before subscribing live. The bus does
    /// not deduplicate: anything published between `replay` and `subscribe`
    /// is the caller's concern. Returns the number of events delivered.
    pub fn replay<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(&GameEvent),
    {
        let mut delivered = 0;
        for line in self.lines() {
            match GameEvent::from_line(&line) {
                Ok(event) => {
                    handler(&event);
                    delivered += 1;
                }
                Err(err) => warn!(%err, "skipping unparseable log line during replay"),
            }
        }
        delivered
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle does *not* unsubscribe; call
/// [`unsubscribe`](Subscription::unsubscribe) explicitly.
#[derive(Debug, Clone)]
pub struct Subscription {
    bus: Weak<Mutex<BusInner>>,
    id: u64,
}

impl Subscription {
    /// Removes exactly this subscriber.
    ///
    /// Idempotent: returns true the first time, false on every later call or
    /// if the bus no longer exists.
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.bus.upgrade() else {
            return false;
        };
        let mut inner = lock(&inner);
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(id, _)| *id != self.id);
        inner.subscribers.len() != before
    }
}
