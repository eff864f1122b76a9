//! The Event Bus: typed synchronous + asynchronous pub/sub with no
//! global state and exact-once delivery per subscription per publish.

use model::{Event, EventKind};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// An opaque subscriber id, returned by [`EventBus::subscribe`] and used to
/// [`EventBus::unsubscribe`]. Never dereferenced — Rust ownership makes a
/// pointer-keyed handle both unsafe and unnecessary here, so this is a
/// plain counter rather than the source's raw `void*` owner key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// An object that can receive events, as an alternative to a bare closure
/// subscription. Concrete listeners implement `on_event` and may ignore
/// event kinds they do not care about.
pub trait EventListener: Send + Sync {
    /// Handle one delivered event.
    fn on_event(&self, event: &Event);
}

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Subscription {
    id: SubscriberId,
    handler: Handler,
}

/// Typed pub/sub used as the coupling fabric between the engine, the
/// scheduler, and the adapter. The subscription table is guarded by one
/// mutex; the async queue uses a separate mutex.
pub struct EventBus {
    next_id: AtomicU64,
    subscriptions: Mutex<HashMap<EventKind, Vec<Subscription>>>,
    queue: Mutex<VecDeque<Event>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// An empty bus with no subscribers and an empty async queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscriptions: Mutex::new(HashMap::new()),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Register a closure handler for events of `kind`.
    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&Event) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.subscribe_handler(kind, Arc::new(handler))
    }

    /// Register a [`EventListener`] object for events of `kind`.
    pub fn subscribe_listener(
        &self,
        kind: EventKind,
        listener: Arc<dyn EventListener>,
    ) -> SubscriberId {
        self.subscribe_handler(kind, Arc::new(move |event: &Event| listener.on_event(event)))
    }

    fn subscribe_handler(&self, kind: EventKind, handler: Handler) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut subscriptions = self.lock_subscriptions();
        subscriptions
            .entry(kind)
            .or_default()
            .push(Subscription { id, handler });
        id
    }

    /// Remove a single subscription for `kind`. A no-op if `id` is not
    /// currently subscribed to `kind` (e.g. it already unsubscribed, or
    /// never subscribed to this kind).
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriberId) {
        let mut subscriptions = self.lock_subscriptions();
        if let Some(subs) = subscriptions.get_mut(&kind) {
            subs.retain(|sub| sub.id != id);
        }
    }

    /// Remove `id` from every event kind's subscription list. Idempotent
    /// and safe to call from within a handler.
    pub fn unsubscribe_all(&self, id: SubscriberId) {
        let mut subscriptions = self.lock_subscriptions();
        for subs in subscriptions.values_mut() {
            subs.retain(|sub| sub.id != id);
        }
    }

    /// Synchronous fan-out on the caller's thread, in subscription order.
    /// The dispatcher takes a snapshot of the subscriber list under the
    /// subscriptions lock, then invokes handlers without the lock held, so
    /// a handler that unsubscribes itself or another owner mid-dispatch
    /// does not affect the in-progress publish and handlers may publish
    /// further events without deadlocking on this bus.
    pub fn notify(&self, event: &Event) {
        let snapshot: Vec<Handler> = {
            let subscriptions = self.lock_subscriptions();
            subscriptions
                .get(&event.kind())
                .map(|subs| subs.iter().map(|sub| Arc::clone(&sub.handler)).collect())
                .unwrap_or_default()
        };
        for handler in snapshot {
            handler(event);
        }
    }

    /// Enqueue `event` for delivery on a later [`EventBus::process`] call,
    /// typically from the scheduler's worker thread.
    pub fn notify_async(&self, event: Event) {
        self.lock_queue().push_back(event);
    }

    /// Drain the async queue, delivering each event with the same
    /// semantics as [`EventBus::notify`], in enqueue order.
    pub fn process(&self) {
        loop {
            let event = self.lock_queue().pop_front();
            match event {
                Some(event) => self.notify(&event),
                None => break,
            }
        }
    }

    fn lock_subscriptions(&self) -> std::sync::MutexGuard<'_, HashMap<EventKind, Vec<Subscription>>> {
        match self.subscriptions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Event>> {
        match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
