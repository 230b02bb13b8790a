// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The staged/live object model shared by every object class.
//!
//! A [`ConfObj`] holds a current attribute set plus the bookkeeping the
//! transaction walks need: staged changes, a pre-commit backup, and
//! markers for objects created or destroyed inside an atomic block. The
//! update walk drives the promotion machinery by interpreter state, so
//! a single generic implementation serves all classes.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use syd_core::error::{Error, Result};

use crate::interp::InterpState;

/// A typed attribute set: parse from `key value` tokens, print back out
/// in a re-parseable form.
pub trait Attrs: Clone + Default + Send + Sync + 'static {
    /// Apply one `key value` pair. Unknown keys are `NotFound`, bad
    /// values surface the parser's error.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Append ` key value` pairs that reconstruct this attribute set
    /// when fed back through [`Attrs::set`].
    fn serialize_args(&self, out: &mut String);
}

/// Type-erased object instance, as stored in a class's instance map.
pub trait ConfObject: Send + Sync + 'static {
    /// Canonical full name, including the namespace prefix when scoped.
    fn full_name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// Owned downcast support for hooks that need the concrete type.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

#[derive(Debug, Clone)]
struct ObjInner<A> {
    current: A,
    /// Changes accumulated inside an atomic block.
    staged: Option<A>,
    /// Backup taken by the first commit pass, consumed by rollback.
    saved: Option<A>,
    enabled: bool,
    staged_enabled: Option<bool>,
    saved_enabled: Option<bool>,
    created_in_txn: bool,
    delete_pending: bool,
}

/// A named object instance of one class.
#[derive(Debug)]
pub struct ConfObj<A: Attrs> {
    name: String,
    inner: Mutex<ObjInner<A>>,
}

impl<A: Attrs> ConfObj<A> {
    pub fn new(name: impl Into<String>, attrs: A, created_in_txn: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            inner: Mutex::new(ObjInner {
                current: attrs,
                staged: None,
                saved: None,
                enabled: false,
                staged_enabled: None,
                saved_enabled: None,
                created_in_txn,
                delete_pending: false,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read a copy of the live attribute set.
    pub fn current(&self) -> A {
        self.inner.lock().current.clone()
    }

    pub fn enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    pub fn is_delete_pending(&self) -> bool {
        self.inner.lock().delete_pending
    }

    pub fn created_in_txn(&self) -> bool {
        self.inner.lock().created_in_txn
    }

    /// Mutate attributes. Outside an atomic block the live set changes
    /// directly; inside one, changes land in a staged copy promoted at
    /// commit.
    pub fn modify<F>(&self, state: InterpState, f: F) -> Result<()>
    where
        F: FnOnce(&mut A) -> Result<()>,
    {
        let mut inner = self.inner.lock();
        if inner.delete_pending {
            return Err(Error::InvalidObject);
        }
        if state == InterpState::Atomic {
            if inner.staged.is_none() {
                inner.staged = Some(inner.current.clone());
            }
            match inner.staged.as_mut() {
                Some(staged) => f(staged),
                None => Err(Error::InvalidObject),
            }
        } else {
            f(&mut inner.current)
        }
    }

    /// Set the enable flag, staged when inside an atomic block.
    pub fn set_enabled(&self, state: InterpState, enabled: bool) {
        let mut inner = self.inner.lock();
        if state == InterpState::Atomic {
            inner.staged_enabled = Some(enabled);
        } else {
            inner.enabled = enabled;
        }
    }

    /// Request destruction. Inside an atomic block the object is only
    /// marked; the commit walk performs the removal.
    pub fn mark_delete(&self) {
        self.inner.lock().delete_pending = true;
    }

    /// Drive the promotion machinery for one update-walk visit.
    ///
    /// Returns `true` when the object should be removed from its
    /// instance map (rolled-back creations, committed deletions).
    /// Idempotent per state value: revisiting with the same state
    /// produces the same live effect.
    pub fn apply(&self, state: InterpState) -> Result<bool> {
        let mut inner = self.inner.lock();
        match state {
            InterpState::AutoCommit | InterpState::Dryrun | InterpState::Preload => Ok(false),
            InterpState::Atomic => Ok(false),
            InterpState::Committing => {
                // First pass: promote staged state to live, keeping a
                // backup for rollback.
                if inner.saved.is_none() {
                    inner.saved = Some(inner.current.clone());
                    inner.saved_enabled = Some(inner.enabled);
                }
                if let Some(staged) = inner.staged.take() {
                    inner.current = staged;
                }
                if let Some(e) = inner.staged_enabled.take() {
                    inner.enabled = e;
                }
                Ok(false)
            }
            InterpState::Committed => {
                // Second pass: discard the backup and settle markers.
                let remove = inner.delete_pending;
                inner.saved = None;
                inner.saved_enabled = None;
                inner.staged = None;
                inner.staged_enabled = None;
                inner.created_in_txn = false;
                Ok(remove)
            }
            InterpState::Rollbacking => {
                if inner.created_in_txn {
                    return Ok(true);
                }
                if let Some(saved) = inner.saved.take() {
                    inner.current = saved;
                }
                if let Some(e) = inner.saved_enabled.take() {
                    inner.enabled = e;
                }
                inner.staged = None;
                inner.staged_enabled = None;
                inner.delete_pending = false;
                Ok(false)
            }
            InterpState::Rollbacked => {
                inner.staged = None;
                inner.staged_enabled = None;
                inner.saved = None;
                inner.saved_enabled = None;
                inner.delete_pending = false;
                Ok(false)
            }
            InterpState::Aborting => {
                if inner.created_in_txn {
                    return Ok(true);
                }
                inner.staged = None;
                inner.staged_enabled = None;
                inner.delete_pending = false;
                Ok(false)
            }
            InterpState::Aborted => {
                inner.staged = None;
                inner.staged_enabled = None;
                inner.delete_pending = false;
                Ok(false)
            }
            InterpState::CommitFailure => Ok(false),
            InterpState::Shutdown | InterpState::Destroying => Ok(false),
        }
    }

    /// The attribute set a serializer should emit for the given state:
    /// staged changes win inside an atomic block so the snapshot
    /// captures the pre-block live state where needed.
    pub fn effective(&self, state: InterpState) -> A {
        let inner = self.inner.lock();
        if state == InterpState::Atomic {
            inner
                .staged
                .clone()
                .unwrap_or_else(|| inner.current.clone())
        } else {
            inner.current.clone()
        }
    }
}

impl<A: Attrs> ConfObject for ConfObj<A> {
    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Split a `namespace:name` full name. Names without a separator live
/// in the default namespace.
pub fn split_name(full: &str) -> (&str, &str) {
    match full.split_once(':') {
        Some((ns, name)) => (ns, name),
        None => ("", full),
    }
}

/// Build a full name from a namespace and a bare name.
pub fn scoped_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}:{name}")
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
