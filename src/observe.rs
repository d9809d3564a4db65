//! Publish-on-change observation primitives
//!
//! A minimal observer-list pattern: each observable quantity holds an ordered
//! list of subscriber callbacks and notifies them synchronously whenever the
//! owning buffer commits a mutation. No external reactive runtime is
//! involved; delivery happens in the same control-flow step as the mutation,
//! strictly after the mutation has completed.

use std::fmt;

use tracing::trace;

/// Opaque handle identifying one subscriber on one channel.
///
/// Returned by [`Observable::subscribe`] and consumed by
/// [`Observable::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Subscriber callback type.
pub type Subscriber<V> = Box<dyn FnMut(V)>;

/// A single observable value with an ordered subscriber list.
///
/// Subscribers receive the current value immediately upon registration and a
/// new value every time the owning buffer commits a mutation, in subscription
/// order. Unsubscribing one callback never affects the others.
pub struct Observable<V: Copy> {
    current: V,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<V>)>,
}

impl<V: Copy> Observable<V> {
    pub(crate) fn new(initial: V) -> Self {
        Self {
            current: initial,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Instantaneous value of this channel.
    pub fn get(&self) -> V {
        self.current
    }

    /// Register a subscriber, delivering the current value to it immediately.
    pub fn subscribe(&mut self, mut f: impl FnMut(V) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        f(self.current);
        self.subscribers.push((id, Box::new(f)));
        trace!(id = id.0, subscribers = self.subscribers.len(), "subscriber registered");
        id
    }

    /// Remove a subscriber, stopping further delivery to it.
    ///
    /// Returns `false` if the id was never registered or was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        let removed = self.subscribers.len() != before;
        if removed {
            trace!(id = id.0, subscribers = self.subscribers.len(), "subscriber removed");
        }
        removed
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Store a new value without notifying anyone.
    ///
    /// Mutations store every derived value before emitting on any channel, so
    /// a subscriber can never observe a half-updated set of counters.
    pub(crate) fn store(&mut self, value: V) {
        self.current = value;
    }

    /// Notify all subscribers of the current value, in subscription order.
    pub(crate) fn emit(&mut self) {
        let value = self.current;
        for (_, f) in &mut self.subscribers {
            f(value);
        }
    }
}

impl<V: Copy + fmt::Debug> fmt::Debug for Observable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// The reactive counter block of a buffer.
///
/// Holds the filled-slot count (the single source of truth) together with the
/// three quantities derived from it. `set_len` is the only way the count
/// changes, which keeps every channel equal to its pure function of the count
/// at every externally observable instant.
pub(crate) struct Gauges {
    capacity: usize,
    pub(crate) filled: Observable<usize>,
    pub(crate) available: Observable<usize>,
    pub(crate) full: Observable<bool>,
    pub(crate) empty: Observable<bool>,
}

impl Gauges {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            filled: Observable::new(0),
            available: Observable::new(capacity),
            full: Observable::new(capacity == 0),
            empty: Observable::new(true),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.filled.get()
    }

    /// Commit a new filled-slot count.
    ///
    /// Two phases: store all four values, then emit channel by channel
    /// (filled, available, full, empty), each channel notifying in
    /// subscription order.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity);
        self.filled.store(len);
        self.available.store(self.capacity - len);
        self.full.store(len == self.capacity);
        self.empty.store(len == 0);
        self.filled.emit();
        self.available.emit();
        self.full.emit();
        self.empty.emit();
    }
}
