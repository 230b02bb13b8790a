// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide lifecycle state tracking with wait/notify.
//!
//! The state only moves forward; every transition wakes all waiters so
//! threads parked in [`StateTracker::wait_for`] can re-evaluate. Shutdown
//! is requested through [`StateTracker::request_shutdown`], which parks
//! the requester until the main loop acknowledges by advancing past
//! `RequestShutdown`.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};

/// Monotonic process lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GlobalState {
    Unknown,
    Initializing,
    Initialized,
    Starting,
    Started,
    RequestShutdown,
    AcceptShutdown,
    ShuttingDown,
    Shutdown,
    Finalizing,
    Finalized,
}

impl GlobalState {
    /// True once shutdown has been requested or is underway.
    pub fn is_shutdown(self) -> bool {
        self >= GlobalState::RequestShutdown
    }
}

/// How urgently a shutdown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownGrace {
    Gracefully,
    RightNow,
}

#[derive(Debug)]
struct Inner {
    state: GlobalState,
    grace: Option<ShutdownGrace>,
}

/// Lifecycle state tracker.
///
/// The process-wide instance is [`global()`]; tests construct their own.
#[derive(Debug)]
pub struct StateTracker {
    inner: Mutex<Inner>,
    cond: Condvar,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: GlobalState::Unknown,
                grace: None,
            }),
            cond: Condvar::new(),
        }
    }

    /// Advance to `s`. Backward transitions fail with
    /// `InvalidStateTransition`; re-setting the current state is allowed.
    pub fn set(&self, s: GlobalState) -> Result<()> {
        let mut inner = self.inner.lock();
        if s < inner.state {
            return Err(Error::InvalidStateTransition);
        }
        inner.state = s;
        self.cond.notify_all();
        Ok(())
    }

    pub fn get(&self) -> GlobalState {
        self.inner.lock().state
    }

    /// The grace level of the pending shutdown request, if any.
    pub fn shutdown_grace(&self) -> Option<ShutdownGrace> {
        self.inner.lock().grace
    }

    /// Block until the state reaches `target` or a shutdown is requested.
    ///
    /// Returns the state (and grace level, when set) observed at wakeup.
    /// Waiting for a non-shutdown target while the process shuts down
    /// yields `NotOperational`; `timeout == None` waits forever.
    pub fn wait_for(
        &self,
        target: GlobalState,
        timeout: Option<Duration>,
    ) -> Result<(GlobalState, Option<ShutdownGrace>)> {
        let deadline = timeout.map(|t| std::time::Instant::now() + t);
        let mut inner = self.inner.lock();
        while inner.state < target && !inner.state.is_shutdown() {
            match deadline {
                Some(d) => {
                    if self.cond.wait_until(&mut inner, d).timed_out() {
                        return Err(Error::Timedout);
                    }
                }
                None => self.cond.wait(&mut inner),
            }
        }
        if inner.state < target && inner.state.is_shutdown() && !target.is_shutdown() {
            return Err(Error::NotOperational);
        }
        Ok((inner.state, inner.grace))
    }

    /// Convenience wrapper: block until a shutdown request arrives.
    pub fn wait_for_shutdown_request(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Option<ShutdownGrace>> {
        self.wait_for(GlobalState::RequestShutdown, timeout)
            .map(|(_, grace)| grace)
    }

    /// Request a shutdown and park until the main loop advances past
    /// `RequestShutdown`. A request issued after shutdown already began
    /// returns immediately.
    pub fn request_shutdown(&self, grace: ShutdownGrace) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state.is_shutdown() {
            return Ok(());
        }
        inner.state = GlobalState::RequestShutdown;
        inner.grace = Some(grace);
        self.cond.notify_all();
        while inner.state <= GlobalState::RequestShutdown {
            self.cond.wait(&mut inner);
        }
        Ok(())
    }

    /// Re-arm the notification primitives in a freshly forked child.
    ///
    /// parking_lot primitives carry no kernel state, so it suffices to
    /// verify the lock is acquirable and drop any stale grace marker left
    /// by a request that died with the parent's threads.
    pub fn atfork_child(&self) {
        if let Some(mut inner) = self.inner.try_lock() {
            if inner.state == GlobalState::RequestShutdown {
                inner.grace = None;
            }
        } else {
            tracing::error!("state tracker lock still held after fork");
        }
    }
}

static TRACKER: StateTracker = StateTracker::new();

/// The process-wide tracker.
pub fn global() -> &'static StateTracker {
    &TRACKER
}

#[cfg(test)]
#[path = "gstate_tests.rs"]
mod tests;
