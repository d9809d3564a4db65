//! The ring buffer core
//!
//! A bounded FIFO container over a fixed-size backing store of `Option<T>`
//! slots. Two cursors move modulo the capacity: `head` points at the oldest
//! occupied slot, `tail` at the next free slot to write into. The filled-slot
//! count lives in the reactive counter block of the `observe` module and is
//! the single source of truth from which fullness, emptiness and available
//! capacity are derived on every mutation.
//!
//! Invariants maintained after every mutation (including positional removal):
//! - `0 <= len <= capacity`
//! - `tail == (head + len) % capacity`
//! - the logical element at offset `i` resides at `storage[(head + i) % capacity]`
//! - a capacity-0 buffer is permanently both full and empty with `head == tail == 0`
//! - vacated slots are reset to `None` so the previous occupant drops right away

use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::errors::RingError;
use crate::observe::{Gauges, Observable};

fn empty_storage<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// A fixed-capacity circular FIFO queue with reactive occupancy counters.
///
/// Elements enter at the tail and leave at the head; positional operations
/// ([`at`](Self::at), [`replace`](Self::replace), [`remove`](Self::remove))
/// address logical offsets counted from the head (non-negative indexes) or
/// from the tail (negative indexes, `-1` being the most recently enqueued
/// element).
///
/// # Examples
///
/// ```
/// use ringflow::RingBuffer;
///
/// # fn main() -> Result<(), ringflow::RingError> {
/// let mut queue = RingBuffer::new(3);
/// queue.enqueue("hello")?;
/// queue.enqueue("world")?;
/// queue.enqueue("!")?;
/// assert_eq!(queue.dequeue()?, "hello");
/// assert_eq!(queue.dequeue()?, "world");
/// queue.enqueue("bye")?;
/// assert_eq!(queue.to_vec(), vec!["!", "bye"]);
/// # Ok(())
/// # }
/// ```
pub struct RingBuffer<T> {
    storage: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    gauges: Gauges,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer with the given number of slots.
    ///
    /// A capacity of zero is legal; such a buffer is permanently both full
    /// and empty, rejecting every enqueue and dequeue.
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: empty_storage(capacity),
            head: 0,
            tail: 0,
            gauges: Gauges::new(capacity),
        }
    }

    /// Checked constructor for untrusted numeric input (CLI flags, config).
    ///
    /// Fails with [`RingError::InvalidCapacity`] when `capacity` is negative.
    pub fn try_with_capacity(capacity: i64) -> Result<Self, RingError> {
        if capacity < 0 {
            return Err(RingError::InvalidCapacity { requested: capacity });
        }
        Ok(Self::new(capacity as usize))
    }

    /// Create a buffer whose capacity equals `items.len()`, filled with the
    /// items in order.
    pub fn from_vec(items: Vec<T>) -> Self {
        let capacity = items.len();
        Self::from_vec_bounded(items, capacity)
    }

    /// Create a buffer with an explicit capacity, filled with the first
    /// `min(items.len(), capacity)` items in order.
    ///
    /// Items beyond the capacity are silently discarded.
    pub fn from_vec_bounded(items: Vec<T>, capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        let copyable = items.len().min(capacity);
        for (slot, item) in buffer.storage.iter_mut().zip(items) {
            *slot = Some(item);
        }
        if capacity > 0 {
            buffer.tail = copyable % capacity;
        }
        buffer.gauges.set_len(copyable);
        buffer
    }

    /// Total number of slots allocated for this buffer. Never changes.
    pub fn capacity(&self) -> usize {
        self.gauges.capacity()
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    /// Number of filled slots (alias of [`len`](Self::len)).
    pub fn filled_slots(&self) -> usize {
        self.len()
    }

    /// Number of free slots.
    pub fn available_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    /// `true` when the number of filled slots equals the capacity.
    ///
    /// A buffer with a capacity of zero is always full.
    pub fn is_full(&self) -> bool {
        self.gauges.full.get()
    }

    /// `true` when the number of filled slots is zero.
    ///
    /// A buffer with a capacity of zero is always empty.
    pub fn is_empty(&self) -> bool {
        self.gauges.empty.get()
    }

    /// Observable channel carrying the filled-slot count.
    pub fn watch_filled_slots(&mut self) -> &mut Observable<usize> {
        &mut self.gauges.filled
    }

    /// Observable channel carrying the free-slot count.
    pub fn watch_available_slots(&mut self) -> &mut Observable<usize> {
        &mut self.gauges.available
    }

    /// Observable channel carrying the fullness flag.
    pub fn watch_full(&mut self) -> &mut Observable<bool> {
        &mut self.gauges.full
    }

    /// Observable channel carrying the emptiness flag.
    pub fn watch_empty(&mut self) -> &mut Observable<bool> {
        &mut self.gauges.empty
    }

    /// Physical slot of a logical head-relative offset.
    ///
    /// Callers must have established `capacity > 0` (every occupied offset
    /// implies it).
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }

    /// Head distance of a signed index, or `None` when out of range.
    fn resolve_index(&self, index: isize) -> Option<usize> {
        let filled = self.len();
        if index >= 0 {
            let distance = index as usize;
            (distance < filled).then_some(distance)
        } else {
            let back = index.unsigned_abs();
            (back <= filled).then(|| filled - back)
        }
    }

    fn occupied(&self, offset: usize) -> &T {
        self.storage[self.slot(offset)]
            .as_ref()
            .expect("slot within the filled range is occupied")
    }

    fn take_occupied(&mut self, offset: usize) -> T {
        let slot = self.slot(offset);
        self.storage[slot]
            .take()
            .expect("slot within the filled range is occupied")
    }

    /// Ordered copy of the logical contents, head to tail.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.len()).map(|i| self.occupied(i).clone()).collect()
    }

    /// Element at a signed logical index, or `None` when the index is
    /// outside the occupied range. Never panics for out-of-range input.
    ///
    /// `at(0)` is the oldest element, `at(-1)` the most recently enqueued.
    pub fn at(&self, index: isize) -> Option<&T> {
        self.resolve_index(index).map(|d| self.occupied(d))
    }

    /// First head-relative offset holding an element equal to `value`, found
    /// by a linear scan from head to tail.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.len()).find(|&i| self.occupied(i) == value)
    }

    /// Append one element at the tail.
    ///
    /// Fails with [`RingError::CapacityExceeded`] when the buffer is full;
    /// the rejected value is dropped, so callers that need to keep it should
    /// check [`available_slots`](Self::available_slots) first.
    pub fn enqueue(&mut self, value: T) -> Result<(), RingError> {
        if self.is_full() {
            debug!(requested = 1usize, available = 0usize, "enqueue rejected: buffer full");
            return Err(RingError::CapacityExceeded {
                requested: 1,
                available: 0,
            });
        }
        let len = self.len();
        self.storage[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.capacity();
        self.gauges.set_len(len + 1);
        trace!(len = len + 1, "enqueued one element");
        Ok(())
    }

    /// Append all elements of `values` in order, all-or-nothing.
    ///
    /// Fails with [`RingError::CapacityExceeded`] before any write when the
    /// batch is larger than the available space (the rejected values are
    /// dropped; check [`available_slots`](Self::available_slots) first to
    /// keep them). On success the counters notify once for the whole batch.
    pub fn enqueue_batch(&mut self, values: Vec<T>) -> Result<(), RingError> {
        let available = self.available_slots();
        if values.len() > available {
            debug!(requested = values.len(), available, "batch enqueue rejected");
            return Err(RingError::CapacityExceeded {
                requested: values.len(),
                available,
            });
        }
        let len = self.len();
        let added = values.len();
        for value in values {
            self.storage[self.tail] = Some(value);
            self.tail = (self.tail + 1) % self.capacity();
        }
        self.gauges.set_len(len + added);
        trace!(added, len = len + added, "enqueued batch");
        Ok(())
    }

    /// Remove and return the oldest element.
    ///
    /// Fails with [`RingError::Underflow`] when the buffer is empty.
    pub fn dequeue(&mut self) -> Result<T, RingError> {
        if self.is_empty() {
            debug!(requested = 1usize, available = 0usize, "dequeue rejected: buffer empty");
            return Err(RingError::Underflow {
                requested: 1,
                available: 0,
            });
        }
        let len = self.len();
        let value = self.take_occupied(0);
        self.head = (self.head + 1) % self.capacity();
        self.gauges.set_len(len - 1);
        trace!(len = len - 1, "dequeued one element");
        Ok(value)
    }

    /// Remove and return the `n` oldest elements, head to tail.
    ///
    /// Fails with [`RingError::Underflow`] before any removal when fewer than
    /// `n` elements are present. `n == 0` is legal and yields an empty vec.
    /// The counters notify once for the whole drain.
    pub fn dequeue_n(&mut self, n: usize) -> Result<Vec<T>, RingError> {
        let filled = self.len();
        if n > filled {
            debug!(requested = n, available = filled, "bulk dequeue rejected");
            return Err(RingError::Underflow {
                requested: n,
                available: filled,
            });
        }
        let values: Vec<T> = (0..n).map(|i| self.take_occupied(i)).collect();
        if n > 0 {
            self.head = (self.head + n) % self.capacity();
        }
        self.gauges.set_len(filled - n);
        trace!(removed = n, len = filled - n, "dequeued batch");
        Ok(values)
    }

    /// Remove and return every element, head to tail. Never fails.
    pub fn dequeue_all(&mut self) -> Vec<T> {
        let filled = self.len();
        self.dequeue_n(filled)
            .expect("dequeueing exactly len elements cannot underflow")
    }

    /// Reset to the empty state.
    ///
    /// The backing store is replaced with a fresh all-empty one of the same
    /// capacity, releasing every contained element.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        self.storage = empty_storage(capacity);
        self.head = 0;
        self.tail = 0;
        self.gauges.set_len(0);
        trace!("buffer cleared");
    }

    /// Overwrite the element at a signed logical index in place, returning
    /// the previous value.
    ///
    /// Cursors and counters are untouched. Fails with
    /// [`RingError::IndexOutOfRange`] when the index is outside the occupied
    /// range.
    pub fn replace(&mut self, index: isize, value: T) -> Result<T, RingError> {
        let Some(distance) = self.resolve_index(index) else {
            debug!(index, filled_slots = self.len(), "replace rejected: index out of range");
            return Err(RingError::IndexOutOfRange {
                index,
                filled_slots: self.len(),
            });
        };
        let slot = self.slot(distance);
        let previous = self.storage[slot]
            .replace(value)
            .expect("slot within the filled range is occupied");
        trace!(index, "replaced element in place");
        Ok(previous)
    }

    /// Remove the element at a signed logical index, returning it.
    ///
    /// Closes the gap by shifting whichever side of the buffer is shorter:
    /// when the element sits strictly closer to the tail, the elements behind
    /// it move one step forward and the tail retreats; otherwise the elements
    /// ahead of it move one step back and the head advances. Either way the
    /// surviving elements keep their logical order and the move count is
    /// `O(min(distance to head, distance to tail))`.
    ///
    /// Fails with [`RingError::IndexOutOfRange`] when the index is outside
    /// the occupied range.
    pub fn remove(&mut self, index: isize) -> Result<T, RingError> {
        let filled = self.len();
        let Some(distance) = self.resolve_index(index) else {
            debug!(index, filled_slots = filled, "remove rejected: index out of range");
            return Err(RingError::IndexOutOfRange {
                index,
                filled_slots: filled,
            });
        };
        let removed = self.take_occupied(distance);
        if filled - distance < distance {
            for i in distance..filled - 1 {
                let from = self.slot(i + 1);
                let to = self.slot(i);
                let moved = self.storage[from].take();
                self.storage[to] = moved;
            }
            self.tail = (self.tail + self.capacity() - 1) % self.capacity();
        } else {
            for i in (0..distance).rev() {
                let from = self.slot(i);
                let to = self.slot(i + 1);
                let moved = self.storage[from].take();
                self.storage[to] = moved;
            }
            self.head = (self.head + 1) % self.capacity();
        }
        self.gauges.set_len(filled - 1);
        trace!(index, len = filled - 1, "removed element");
        Ok(removed)
    }

    /// Lazy, one-shot consuming iterator: each step dequeues the oldest
    /// element (publishing counter notifications per step) until the buffer
    /// is empty. Dropping it early has no effect beyond the elements already
    /// consumed.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { buffer: self }
    }
}

impl<T> From<Vec<T>> for RingBuffer<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}

/// Consuming iterator returned by [`RingBuffer::drain`].
pub struct Drain<'a, T> {
    buffer: &'a mut RingBuffer<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.dequeue().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}
