// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded blocking queue.
//!
//! Fixed-capacity FIFO shared by producers and consumers. Blocked
//! callers are safe against wakeup at the boundary: a timed-out or
//! shut-down waiter leaves the queue exactly as it found it. After
//! [`BoundedQueue::shutdown`], every `put`/`get`/`peek` returns
//! `NotOperational`; values resident at clear or shutdown are dropped.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::error::{Error, Result};

/// How long a queue operation may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until the operation can proceed or the queue shuts down.
    Forever,
    /// Fail with `Timedout` instead of blocking.
    Immediate,
    /// Block up to the given duration.
    After(Duration),
}

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<T>,
    operational: bool,
}

/// Single-producer/consumer safe bounded FIFO.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                operational: true,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        let inner = self.inner.lock();
        inner.items.len() >= self.capacity
    }

    pub fn is_operational(&self) -> bool {
        self.inner.lock().operational
    }

    /// Wait on `cond` until `ready` holds, the deadline passes, or the
    /// queue stops being operational.
    fn wait_until<F>(
        &self,
        inner: &mut MutexGuard<'_, Inner<T>>,
        cond: &Condvar,
        timeout: Timeout,
        ready: F,
    ) -> Result<()>
    where
        F: Fn(&Inner<T>) -> bool,
    {
        let deadline = match timeout {
            Timeout::Forever => None,
            Timeout::Immediate => {
                return if ready(inner) {
                    Ok(())
                } else {
                    Err(Error::Timedout)
                };
            }
            Timeout::After(d) => Some(Instant::now() + d),
        };
        while !ready(inner) {
            if !inner.operational {
                return Err(Error::NotOperational);
            }
            match deadline {
                Some(d) => {
                    if cond.wait_until(inner, d).timed_out() && !ready(inner) {
                        return Err(Error::Timedout);
                    }
                }
                None => cond.wait(inner),
            }
        }
        Ok(())
    }

    /// Append `val`, blocking while the queue is full.
    pub fn put(&self, val: T, timeout: Timeout) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        self.wait_until(&mut inner, &self.not_full, timeout, |i| {
            i.items.len() < self.capacity
        })?;
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        inner.items.push_back(val);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the head, blocking while the queue is empty.
    pub fn get(&self, timeout: Timeout) -> Result<T> {
        let mut inner = self.inner.lock();
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        self.wait_until(&mut inner, &self.not_empty, timeout, |i| {
            !i.items.is_empty()
        })?;
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        let val = inner.items.pop_front().ok_or(Error::NotOperational)?;
        self.not_full.notify_one();
        Ok(val)
    }

    /// Return a copy of the head without removing it.
    pub fn peek(&self, timeout: Timeout) -> Result<T>
    where
        T: Clone,
    {
        let mut inner = self.inner.lock();
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        self.wait_until(&mut inner, &self.not_empty, timeout, |i| {
            !i.items.is_empty()
        })?;
        if !inner.operational {
            return Err(Error::NotOperational);
        }
        inner.items.front().cloned().ok_or(Error::NotOperational)
    }

    /// Drop every queued value; the queue stays operational.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.items.clear();
        self.not_full.notify_all();
    }

    /// Stop the queue. Queued values are dropped and all waiters wake
    /// with `NotOperational`.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        inner.operational = false;
        inner.items.clear();
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}

#[cfg(test)]
#[path = "bbq_tests.rs"]
mod tests;
