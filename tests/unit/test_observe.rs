//! Unit tests for the observation contract
//!
//! Tests cover:
//! - Immediate delivery of the current value on subscription
//! - One notification per mutating operation, in mutation order
//! - Consistency of the derived channels at every delivery
//! - Subscription-order delivery and unsubscription isolation
//! - No-op mutations publishing like the real ones

use std::cell::RefCell;
use std::rc::Rc;

use ringflow::RingBuffer;

fn recorder<V: Copy + 'static>() -> (Rc<RefCell<Vec<V>>>, impl FnMut(V) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |v| sink.borrow_mut().push(v))
}

#[test]
fn test_subscription_delivers_current_value_immediately() {
    let mut buf = RingBuffer::new(3);
    buf.enqueue(1).unwrap();
    buf.enqueue(2).unwrap();

    let (filled, f) = recorder();
    buf.watch_filled_slots().subscribe(f);
    let (available, f) = recorder();
    buf.watch_available_slots().subscribe(f);
    let (full, f) = recorder();
    buf.watch_full().subscribe(f);
    let (empty, f) = recorder();
    buf.watch_empty().subscribe(f);

    assert_eq!(*filled.borrow(), vec![2]);
    assert_eq!(*available.borrow(), vec![1]);
    assert_eq!(*full.borrow(), vec![false]);
    assert_eq!(*empty.borrow(), vec![false]);
}

#[test]
fn test_filled_slots_tracks_every_mutation() {
    let mut buf = RingBuffer::new(2);
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    buf.enqueue(10).unwrap();
    buf.enqueue(11).unwrap();
    buf.dequeue().unwrap();
    buf.dequeue().unwrap();
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 1, 0]);
}

#[test]
fn test_boolean_channels_fire_on_every_count_change() {
    let mut buf = RingBuffer::new(3);
    let (empty, f) = recorder();
    buf.watch_empty().subscribe(f);

    buf.enqueue(1).unwrap();
    buf.enqueue(2).unwrap();
    buf.dequeue().unwrap();
    // redelivered even when the flag itself didn't flip
    assert_eq!(*empty.borrow(), vec![true, false, false, false]);
}

#[test]
fn test_full_flag_transitions() {
    let mut buf = RingBuffer::new(2);
    let (full, f) = recorder();
    buf.watch_full().subscribe(f);

    buf.enqueue(1).unwrap();
    buf.enqueue(2).unwrap();
    buf.clear();
    assert_eq!(*full.borrow(), vec![false, false, true, false]);
}

#[test]
fn test_batch_operations_notify_once() {
    let mut buf = RingBuffer::new(8);
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    buf.enqueue_batch(vec![1, 2, 3]).unwrap();
    buf.dequeue_n(2).unwrap();
    buf.dequeue_all();
    assert_eq!(*seen.borrow(), vec![0, 3, 1, 0]);
}

#[test]
fn test_rejected_operations_do_not_notify() {
    let mut buf = RingBuffer::new(1);
    buf.enqueue(1).unwrap();
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    assert!(buf.enqueue(2).is_err());
    assert!(buf.enqueue_batch(vec![3, 4]).is_err());
    assert!(buf.dequeue_n(5).is_err());
    assert!(buf.replace(7, 0).is_err());
    assert!(buf.remove(-9).is_err());
    assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn test_replace_does_not_notify() {
    let mut buf = RingBuffer::new(3);
    buf.enqueue(1).unwrap();
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    buf.replace(0, 9).unwrap();
    assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn test_noop_mutations_still_publish() {
    let mut buf: RingBuffer<u8> = RingBuffer::new(4);
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    buf.dequeue_n(0).unwrap();
    buf.enqueue_batch(vec![]).unwrap();
    buf.clear();
    assert_eq!(*seen.borrow(), vec![0, 0, 0, 0]);
}

#[test]
fn test_derived_channels_stay_consistent() {
    // record (filled, available, full, empty) tuples by pairing channels
    let mut buf = RingBuffer::new(3);
    let log = Rc::new(RefCell::new(Vec::new()));

    let filled_log = Rc::new(RefCell::new(0usize));
    let available_log = Rc::new(RefCell::new(0usize));
    let full_log = Rc::new(RefCell::new(false));

    let sink = Rc::clone(&filled_log);
    buf.watch_filled_slots().subscribe(move |n| *sink.borrow_mut() = n);
    let sink = Rc::clone(&available_log);
    buf.watch_available_slots().subscribe(move |n| *sink.borrow_mut() = n);
    let sink = Rc::clone(&full_log);
    buf.watch_full().subscribe(move |b| *sink.borrow_mut() = b);

    // the empty channel emits last, so by the time it runs every other
    // channel already carries the post-mutation value
    let filled = Rc::clone(&filled_log);
    let available = Rc::clone(&available_log);
    let full = Rc::clone(&full_log);
    let sink = Rc::clone(&log);
    buf.watch_empty().subscribe(move |empty| {
        sink.borrow_mut()
            .push((*filled.borrow(), *available.borrow(), *full.borrow(), empty));
    });

    buf.enqueue(1).unwrap();
    buf.enqueue_batch(vec![2, 3]).unwrap();
    buf.dequeue().unwrap();
    buf.clear();

    for &(filled, available, full, empty) in log.borrow().iter() {
        assert_eq!(filled + available, 3);
        assert_eq!(full, filled == 3);
        assert_eq!(empty, filled == 0);
    }
    let observed: Vec<usize> = log.borrow().iter().map(|t| t.0).collect();
    assert_eq!(observed, vec![0, 1, 3, 2, 0]);
}

#[test]
fn test_subscribers_notified_in_subscription_order() {
    let mut buf = RingBuffer::new(2);
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let sink = Rc::clone(&order);
        buf.watch_filled_slots().subscribe(move |_| sink.borrow_mut().push(tag));
    }
    order.borrow_mut().clear();

    buf.enqueue(1).unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_unsubscribe_stops_delivery_without_affecting_others() {
    let mut buf = RingBuffer::new(4);
    let (first, f) = recorder();
    let (second, g) = recorder();
    let id = buf.watch_filled_slots().subscribe(f);
    buf.watch_filled_slots().subscribe(g);

    buf.enqueue(1).unwrap();
    assert!(buf.watch_filled_slots().unsubscribe(id));
    buf.enqueue(2).unwrap();

    assert_eq!(*first.borrow(), vec![0, 1]);
    assert_eq!(*second.borrow(), vec![0, 1, 2]);
    assert!(!buf.watch_filled_slots().unsubscribe(id));
    assert_eq!(buf.watch_filled_slots().subscriber_count(), 1);
}

#[test]
fn test_drain_publishes_per_step() {
    let mut buf = RingBuffer::new(3);
    buf.enqueue_batch(vec![1, 2, 3]).unwrap();
    let (seen, f) = recorder();
    buf.watch_filled_slots().subscribe(f);

    let _: Vec<i32> = buf.drain().collect();
    assert_eq!(*seen.borrow(), vec![3, 2, 1, 0]);
}
