// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use super::{BoundedQueue, Timeout};
use crate::error::Error;

#[test]
fn fifo_order() {
    let q = BoundedQueue::new(4);
    q.put(1, Timeout::Immediate).unwrap();
    q.put(2, Timeout::Immediate).unwrap();
    q.put(3, Timeout::Immediate).unwrap();
    assert_eq!(q.get(Timeout::Immediate), Ok(1));
    assert_eq!(q.get(Timeout::Immediate), Ok(2));
    assert_eq!(q.get(Timeout::Immediate), Ok(3));
}

#[test]
fn eleven_nonblocking_puts_into_ten_slots() {
    let q = BoundedQueue::new(10);
    for i in 0..10 {
        assert_eq!(q.put(i, Timeout::Immediate), Ok(()));
    }
    assert_eq!(q.put(10, Timeout::Immediate), Err(Error::Timedout));
    assert_eq!(q.len(), 10);
    assert!(q.is_full());
}

#[test]
fn get_on_empty_times_out() {
    let q: BoundedQueue<u32> = BoundedQueue::new(2);
    assert_eq!(q.get(Timeout::Immediate), Err(Error::Timedout));
    assert_eq!(
        q.get(Timeout::After(Duration::from_millis(20))),
        Err(Error::Timedout)
    );
    // Timed-out waiter left the queue in its pre-call state.
    assert!(q.is_empty());
    assert!(q.is_operational());
}

#[test]
fn peek_does_not_consume() {
    let q = BoundedQueue::new(2);
    q.put(7u32, Timeout::Immediate).unwrap();
    assert_eq!(q.peek(Timeout::Immediate), Ok(7));
    assert_eq!(q.len(), 1);
    assert_eq!(q.get(Timeout::Immediate), Ok(7));
}

#[test]
fn blocked_put_unblocks_on_get() {
    let q = Arc::new(BoundedQueue::new(1));
    q.put(1u32, Timeout::Immediate).unwrap();
    let q2 = Arc::clone(&q);
    let producer =
        std::thread::spawn(move || q2.put(2, Timeout::After(Duration::from_secs(5))));
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(q.get(Timeout::Immediate), Ok(1));
    producer.join().unwrap().unwrap();
    assert_eq!(q.get(Timeout::Immediate), Ok(2));
}

#[test]
fn shutdown_wakes_blocked_getter() {
    let q: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(1));
    let q2 = Arc::clone(&q);
    let consumer = std::thread::spawn(move || q2.get(Timeout::Forever));
    std::thread::sleep(Duration::from_millis(20));
    q.shutdown();
    assert_eq!(consumer.join().unwrap(), Err(Error::NotOperational));
}

#[test]
fn operations_fail_after_shutdown() {
    let q = BoundedQueue::new(2);
    q.put(1u32, Timeout::Immediate).unwrap();
    q.shutdown();
    assert!(!q.is_operational());
    assert_eq!(q.put(2, Timeout::Immediate), Err(Error::NotOperational));
    assert_eq!(q.get(Timeout::Immediate), Err(Error::NotOperational));
    assert_eq!(q.peek(Timeout::Immediate), Err(Error::NotOperational));
    // Resident values were dropped at shutdown.
    assert!(q.is_empty());
}

#[test]
fn clear_keeps_queue_operational() {
    let q = BoundedQueue::new(2);
    q.put(1u32, Timeout::Immediate).unwrap();
    q.clear();
    assert!(q.is_empty());
    assert!(q.is_operational());
    q.put(2, Timeout::Immediate).unwrap();
    assert_eq!(q.get(Timeout::Immediate), Ok(2));
}
