//! Usage Meter Demo
//!
//! The terminal rendition of a dashboard widget: one subscriber renders a
//! usage bar from the filled-slots channel, another prints the queue contents
//! after every change, and the full/empty channels announce transitions.
//!
//! # Running this demo
//!
//! ```bash
//! cargo run --example usage_meter
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ringflow::{RingBuffer, RingError};

fn main() -> Result<(), RingError> {
    if std::env::var("RINGFLOW_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("ringflow=trace")
            .init();
    }

    let mut queue: RingBuffer<u32> = RingBuffer::new(8);
    let capacity = queue.capacity();

    queue.watch_filled_slots().subscribe(move |n| {
        let bar: String = (0..capacity).map(|i| if i < n { '#' } else { '.' }).collect();
        println!("[{bar}] {n}/{capacity}");
    });
    queue.watch_full().subscribe(|full| {
        if full {
            println!("  -> buffer is full");
        }
    });
    queue.watch_empty().subscribe(|empty| {
        if empty {
            println!("  -> buffer is empty");
        }
    });

    // a snapshot subscriber that can be detached later
    let snapshots = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&snapshots);
    let snapshot_id = queue.watch_filled_slots().subscribe(move |_| {
        *counter.borrow_mut() += 1;
    });

    println!("filling up:");
    for i in 1..=8 {
        queue.enqueue(i)?;
    }

    println!("positional maintenance:");
    let replaced = queue.replace(0, 100)?;
    println!("  replaced head value {replaced}");
    let removed = queue.remove(-2)?;
    println!("  removed {removed} near the tail");
    let removed = queue.remove(3)?;
    println!("  removed {removed} from the middle");

    queue.watch_filled_slots().unsubscribe(snapshot_id);
    println!("snapshot subscriber saw {} updates", snapshots.borrow());

    println!("draining:");
    for value in queue.drain() {
        println!("  got {value}");
    }
    Ok(())
}
