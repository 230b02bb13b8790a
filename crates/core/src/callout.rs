// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline- and interval-driven task execution.
//!
//! The table does not own a thread; an embedder ticks it by calling
//! [`CalloutTable::run_due`] from its main loop. Tasks run with the
//! table unlocked, so a task may register or cancel callouts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;

type Task = Box<dyn FnMut() -> Result<()> + Send>;

struct Entry {
    fires_at: Instant,
    interval: Option<Duration>,
    task: Task,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("fires_at", &self.fires_at)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Named one-shot and periodic callouts.
#[derive(Debug, Default)]
pub struct CalloutTable {
    entries: Mutex<HashMap<String, Entry>>,
}

impl CalloutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callout firing after `delay`, then every `interval`
    /// when one is given. Re-registering a name replaces the old entry.
    pub fn register(
        &self,
        name: impl Into<String>,
        delay: Duration,
        interval: Option<Duration>,
        task: Task,
    ) {
        let entry = Entry {
            fires_at: Instant::now() + delay,
            interval,
            task,
        };
        self.entries.lock().insert(name.into(), entry);
    }

    pub fn cancel(&self, name: &str) {
        self.entries.lock().remove(name);
    }

    /// Cancel every callout whose name starts with `prefix`.
    pub fn cancel_with_prefix(&self, prefix: &str) {
        self.entries.lock().retain(|n, _| !n.starts_with(prefix));
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.lock().values().map(|e| e.fires_at).min()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Fire every due task and return how many ran. Periodic tasks are
    /// re-armed relative to `now`; a task error is logged and cancels
    /// the entry.
    pub fn run_due(&self, now: Instant) -> usize {
        let mut due = Vec::new();
        {
            let mut entries = self.entries.lock();
            let names: Vec<String> = entries
                .iter()
                .filter(|(_, e)| e.fires_at <= now)
                .map(|(n, _)| n.clone())
                .collect();
            for name in names {
                if let Some(entry) = entries.remove(&name) {
                    due.push((name, entry));
                }
            }
        }

        let fired = due.len();
        for (name, mut entry) in due {
            let outcome = (entry.task)();
            match outcome {
                Ok(()) => {
                    if let Some(iv) = entry.interval {
                        entry.fires_at = now + iv;
                        let mut entries = self.entries.lock();
                        // A task may have re-registered its own name.
                        entries.entry(name).or_insert(entry);
                    }
                }
                Err(e) => {
                    tracing::warn!(callout = %name, error = %e, "callout failed, cancelled");
                }
            }
        }
        fired
    }
}

#[cfg(test)]
#[path = "callout_tests.rs"]
mod tests;
