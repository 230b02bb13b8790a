// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configurator registry and the process-wide exclusive lock.
//!
//! A configurator is a named source of configuration commands (the
//! startup file loader, an interactive session, an RPC bridge). At most
//! one configurator holds the lock at a time; re-locking by the holder
//! is idempotent and unlocking an unlocked registry is too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use syd_core::error::{Error, Result};
use syd_core::hashmap::StrMap;

/// A registered configuration source.
#[derive(Debug)]
pub struct Configurator {
    name: String,
    has_lock: AtomicBool,
}

impl Configurator {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_lock(&self) -> bool {
        self.has_lock.load(Ordering::Acquire)
    }
}

/// Registry plus single-holder lock.
#[derive(Debug, Default)]
pub struct ConfiguratorRegistry {
    configurators: StrMap<Arc<Configurator>>,
    holder: Mutex<Option<Arc<Configurator>>>,
}

impl ConfiguratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgs);
        }
        let cnf = Arc::new(Configurator {
            name: name.to_string(),
            has_lock: AtomicBool::new(false),
        });
        self.configurators.add(name.to_string(), cnf)
    }

    /// Remove a configurator. The current lock holder cannot be
    /// unregistered.
    pub fn unregister(&self, name: &str) -> Result<()> {
        let holder = self.holder.lock();
        if holder.as_ref().is_some_and(|h| h.name == name) {
            return Err(Error::Busy);
        }
        drop(holder);
        self.configurators.delete(name).map(|_| ())
    }

    pub fn find(&self, name: &str) -> Result<Arc<Configurator>> {
        self.configurators.find(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.configurators.contains_key(name)
    }

    /// Take the exclusive lock for `name`. Idempotent for the current
    /// holder; `Busy` while another configurator holds it.
    pub fn lock(&self, name: &str) -> Result<()> {
        let cnf = self.configurators.find(name)?;
        let mut holder = self.holder.lock();
        match holder.as_ref() {
            None => {
                cnf.has_lock.store(true, Ordering::Release);
                *holder = Some(cnf);
                Ok(())
            }
            Some(h) if h.name == name => Ok(()),
            Some(_) => Err(Error::Busy),
        }
    }

    /// Release the exclusive lock. Unlocking when nothing is locked is
    /// idempotent; a non-holder gets `NotOwner`.
    pub fn unlock(&self, name: &str) -> Result<()> {
        let mut holder = self.holder.lock();
        match holder.as_ref() {
            None => Ok(()),
            Some(h) if h.name == name => {
                if !h.has_lock.swap(false, Ordering::AcqRel) {
                    // The holder record says it never took the lock:
                    // unreachable without memory corruption.
                    tracing::error!(
                        configurator = name,
                        "configurator lock state corrupted, aborting"
                    );
                    std::process::abort();
                }
                *holder = None;
                Ok(())
            }
            Some(_) => Err(Error::NotOwner),
        }
    }

    /// Name of the current lock holder, if any.
    pub fn holder(&self) -> Option<String> {
        self.holder.lock().as_ref().map(|h| h.name.clone())
    }

    /// The process-wide registry and lock.
    pub fn global() -> Arc<ConfiguratorRegistry> {
        static GLOBAL: std::sync::OnceLock<Arc<ConfiguratorRegistry>> = std::sync::OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ConfiguratorRegistry::new())))
    }
}

#[cfg(test)]
#[path = "configurator_tests.rs"]
mod tests;
