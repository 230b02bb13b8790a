// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! String-keyed and word-keyed concurrent maps.
//!
//! Both flavors share one generic implementation. Values are typically
//! `Arc`s; [`TypedMap::find`] hands out clones so no lock is held across
//! caller code. Iteration grants in-place mutation of the visited entry
//! (`&mut V`) but no structural access, so a predicate cannot add or
//! delete while the walk is underway. The map lock is not re-entrant:
//! calling back into the same map from a predicate deadlocks.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Concurrent hashmap used for registries and instance tables.
#[derive(Debug)]
pub struct TypedMap<K, V> {
    inner: Mutex<HashMap<K, V>>,
}

/// String-keyed flavor. Keys are owned copies; equality is byte compare.
pub type StrMap<V> = TypedMap<String, V>;

/// Word-keyed flavor, used for session ids and similar raw handles.
pub type WordMap<V> = TypedMap<u64, V>;

impl<K: Eq + Hash, V> Default for TypedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> TypedMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Insert without overwriting. `AlreadyExists` leaves the map
    /// unchanged; the rejected value is dropped.
    pub fn add(&self, key: K, val: V) -> Result<()> {
        let mut map = self.inner.lock();
        match map.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => Err(Error::AlreadyExists),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(val);
                Ok(())
            }
        }
    }

    /// Insert with overwrite, returning the previous value so the caller
    /// can dispose of it.
    pub fn put(&self, key: K, val: V) -> Option<V> {
        self.inner.lock().insert(key, val)
    }

    /// Look up a clone of the value. `NotFound` is distinct from any
    /// value a present entry may hold.
    pub fn find<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned().ok_or(Error::NotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    /// Remove an entry, returning its value. Dropping the returned value
    /// frees it; binding it hands ownership back to the caller.
    pub fn delete<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().remove(key).ok_or(Error::NotFound)
    }

    /// Visit every entry once. The predicate may mutate the entry in
    /// place; returning `false` halts the walk with `IterationHalted`.
    pub fn iterate<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut map = self.inner.lock();
        for (k, v) in map.iter_mut() {
            if !f(k, v) {
                return Err(Error::IterationHalted);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Re-arm the internal lock in a freshly forked child.
    ///
    /// parking_lot locks are plain words with no kernel state; a child
    /// inherits a usable lock unless some parent thread held it at the
    /// fork instant, which the single-threaded-fork rule forbids.
    pub fn atfork_child(&self) {
        if self.inner.try_lock().is_none() {
            tracing::error!("map lock still held after fork");
        }
    }
}

impl<K: Eq + Hash, V: Clone> TypedMap<K, V> {
    /// Snapshot all values, in unspecified order.
    pub fn values(&self) -> Vec<V> {
        self.inner.lock().values().cloned().collect()
    }

    /// Snapshot all keys and values, in unspecified order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
    {
        self.inner
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "hashmap_tests.rs"]
mod tests;
