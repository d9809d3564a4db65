//! Console Driver Demo
//!
//! Drives a small ring buffer through a scripted workload while a subscriber
//! on the filled-slots channel reports the usage percentage after every
//! mutation.
//!
//! # Running this demo
//!
//! ```bash
//! cargo run --example console
//!
//! # with trace-level logging from the buffer itself
//! RINGFLOW_DEBUG=1 cargo run --example console
//! ```

use ringflow::{RingBuffer, RingError};

fn main() -> Result<(), RingError> {
    if std::env::var("RINGFLOW_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("ringflow=trace")
            .init();
    }

    let mut queue = RingBuffer::try_with_capacity(10)?;
    let capacity = queue.capacity();
    queue
        .watch_filled_slots()
        .subscribe(move |n| println!("usage: {}%", n * 100 / capacity));

    queue.enqueue(10)?;
    queue.enqueue_batch(vec![11, 12, 13])?;
    queue.enqueue_batch(vec![11, 12, 13])?;
    queue.enqueue_batch(vec![11, 12, 13])?;

    if let Err(err) = queue.enqueue(99) {
        println!("rejected as expected: {err}");
    }

    let drained = queue.dequeue_all();
    println!("drained: {drained:?}");
    Ok(())
}
