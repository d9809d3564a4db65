//! Ringflow - Reactive Fixed-Capacity Ring Buffer
//!
//! A bounded FIFO container over a fixed-size backing store that exposes its
//! occupancy as observable channels, built on three ideas:
//!
//! - **One source of truth**: every derived quantity (filled slots, available
//!   slots, full, empty) is a pure function of the element count and is
//!   recomputed on every mutation, never drifting out of sync.
//! - **Synchronous observation**: subscribers are notified in the same
//!   control-flow step as the mutation, strictly after it has completed, in
//!   subscription order. No reactive runtime, no scheduling.
//! - **Positional access**: beyond FIFO enqueue/dequeue, elements can be read,
//!   replaced and removed by signed logical index (`0` = oldest, `-1` = most
//!   recently enqueued), with removal shifting the shorter side of the buffer.
//!
//! # Quick Start
//!
//! ```
//! use ringflow::RingBuffer;
//!
//! # fn main() -> Result<(), ringflow::RingError> {
//! let mut queue = RingBuffer::new(3);
//! queue.enqueue(10)?;
//! queue.enqueue_batch(vec![11, 12])?;
//! assert!(queue.is_full());
//! assert_eq!(queue.dequeue()?, 10);
//! assert_eq!(queue.at(-1), Some(&12));
//! assert_eq!(queue.to_vec(), vec![11, 12]);
//! # Ok(())
//! # }
//! ```
//!
//! # Watching the counters
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ringflow::RingBuffer;
//!
//! # fn main() -> Result<(), ringflow::RingError> {
//! let mut queue = RingBuffer::new(4);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! queue.watch_filled_slots().subscribe(move |n| sink.borrow_mut().push(n));
//!
//! queue.enqueue(7)?;
//! queue.enqueue(8)?;
//! queue.dequeue()?;
//! // current value on subscription, then one value per mutation
//! assert_eq!(*seen.borrow(), vec![0, 1, 2, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! The buffer is single-threaded and performs no internal synchronization;
//! callers needing concurrent access must wrap it in their own lock.

pub mod buffer;
pub mod errors;
pub mod observe;

pub use buffer::{Drain, RingBuffer};
pub use errors::RingError;
pub use observe::{Observable, Subscriber, SubscriptionId};
