// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::CalloutTable;
use crate::error::Error;

fn counter_task(counter: &Arc<AtomicUsize>) -> Box<dyn FnMut() -> crate::Result<()> + Send> {
    let counter = Arc::clone(counter);
    Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn one_shot_fires_once() {
    let table = CalloutTable::new();
    let hits = Arc::new(AtomicUsize::new(0));
    table.register("once", Duration::ZERO, None, counter_task(&hits));

    let now = Instant::now();
    assert_eq!(table.run_due(now), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    // Gone after firing.
    assert!(table.is_empty());
    assert_eq!(table.run_due(now + Duration::from_secs(1)), 0);
}

#[test]
fn not_due_does_not_fire() {
    let table = CalloutTable::new();
    let hits = Arc::new(AtomicUsize::new(0));
    table.register("later", Duration::from_secs(60), None, counter_task(&hits));
    assert_eq!(table.run_due(Instant::now()), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(table.len(), 1);
}

#[test]
fn interval_task_rearms() {
    let table = CalloutTable::new();
    let hits = Arc::new(AtomicUsize::new(0));
    table.register(
        "tick",
        Duration::ZERO,
        Some(Duration::from_millis(10)),
        counter_task(&hits),
    );

    let t0 = Instant::now();
    assert_eq!(table.run_due(t0), 1);
    assert_eq!(table.len(), 1);
    assert_eq!(table.run_due(t0 + Duration::from_millis(15)), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn failing_task_is_cancelled() {
    let table = CalloutTable::new();
    table.register(
        "bad",
        Duration::ZERO,
        Some(Duration::from_millis(1)),
        Box::new(|| Err(Error::NotOperational)),
    );
    assert_eq!(table.run_due(Instant::now()), 1);
    assert!(table.is_empty());
}

#[test]
fn cancel_and_prefix_cancel() {
    let table = CalloutTable::new();
    let hits = Arc::new(AtomicUsize::new(0));
    table.register("a.one", Duration::ZERO, None, counter_task(&hits));
    table.register("a.two", Duration::ZERO, None, counter_task(&hits));
    table.register("b.one", Duration::ZERO, None, counter_task(&hits));

    table.cancel("a.one");
    table.cancel_with_prefix("a.");
    assert_eq!(table.run_due(Instant::now()), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn next_deadline_is_minimum() {
    let table = CalloutTable::new();
    let hits = Arc::new(AtomicUsize::new(0));
    assert!(table.next_deadline().is_none());
    table.register("far", Duration::from_secs(60), None, counter_task(&hits));
    table.register("near", Duration::from_secs(1), None, counter_task(&hits));
    let d = table.next_deadline().unwrap();
    assert!(d <= Instant::now() + Duration::from_secs(2));
}
