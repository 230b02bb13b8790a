// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object classes: the per-class operation table and the registry the
//! transaction walks traverse.
//!
//! Class visit order is fixed: every dependency of a class appears
//! earlier in [`CLASS_ORDER`], so forward walks create and serialize
//! safely and the reverse walk destroys safely. Classes register once
//! at startup; registration during an active transaction walk is not
//! supported.

use std::cmp::Ordering;
use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::hashmap::StrMap;

use crate::interp::InterpState;
use crate::object::{split_name, Attrs, ConfObj, ConfObject};
use crate::results::ResultBuf;

/// Fixed dependency order. Destruction walks it in reverse.
pub const CLASS_ORDER: [&str; 8] = [
    "policer-action",
    "policer",
    "queue",
    "interface",
    "port",
    "channel",
    "controller",
    "bridge",
];

/// The per-class operation table.
///
/// Implementations interpret the interpreter state the transaction
/// manager passes in: `Committing` promotes staged changes,
/// `Rollbacking` reverts them, `Aborting` discards them, and so on.
/// `destroy` removes the object from the class's instance map when the
/// state allows immediate destruction, or stages the removal inside an
/// atomic block.
pub trait ClassHooks: Send + Sync + 'static {
    /// Apply staged changes to live state for one walk visit.
    fn update(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        result: &mut ResultBuf,
    ) -> Result<()>;

    /// Query or set the enable flag. `do_set == false` reads.
    fn enable(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        do_set: bool,
        new_enabled: Option<bool>,
    ) -> Result<bool>;

    /// Write a re-parseable text representation.
    fn serialize(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        out: &mut String,
    ) -> Result<()>;

    /// Free live resources and drop the object from the instance map
    /// (immediately, or at commit when called inside an atomic block).
    fn destroy(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        result: &mut ResultBuf,
    ) -> Result<()>;

    /// Total order for deterministic serialization.
    fn compare(&self, a: &Arc<dyn ConfObject>, b: &Arc<dyn ConfObject>) -> Ordering {
        a.full_name().cmp(&b.full_name())
    }

    /// Canonical full name including namespace.
    fn name_of(&self, obj: &Arc<dyn ConfObject>) -> Result<String> {
        Ok(obj.full_name())
    }

    /// Clone an object into another namespace (dry-run support).
    fn duplicate(&self, obj: &Arc<dyn ConfObject>, dst_namespace: &str) -> Result<()>;
}

/// One registered class: its name, instance map, and operation table.
#[derive(Clone)]
pub struct ClassEntry {
    pub name: String,
    pub instances: Arc<StrMap<Arc<dyn ConfObject>>>,
    pub hooks: Arc<dyn ClassHooks>,
}

impl std::fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .finish_non_exhaustive()
    }
}

impl ClassEntry {
    /// Compare-sorted snapshot of this class's instances.
    pub fn sorted_objects(&self) -> Vec<Arc<dyn ConfObject>> {
        let mut objs = self.instances.values();
        objs.sort_by(|a, b| self.hooks.compare(a, b));
        objs
    }
}

/// Registry of object classes.
///
/// The process-wide instance is [`ClassRegistry::global`]; interpreter
/// tests construct their own so classes can be registered freely.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: StrMap<Arc<ClassEntry>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. `InvalidArgs` for an empty name,
    /// `AlreadyExists` for a duplicate.
    pub fn register(&self, entry: ClassEntry) -> Result<()> {
        if entry.name.is_empty() {
            return Err(Error::InvalidArgs);
        }
        self.classes.add(entry.name.clone(), Arc::new(entry))
    }

    pub fn find(&self, name: &str) -> Result<Arc<ClassEntry>> {
        self.classes.find(name)
    }

    /// Flat snapshot of one class's instances, compare-sorted on
    /// request.
    pub fn get_objects(&self, name: &str, sort: bool) -> Result<Vec<Arc<dyn ConfObject>>> {
        let entry = self.classes.find(name)?;
        Ok(if sort {
            entry.sorted_objects()
        } else {
            entry.instances.values()
        })
    }

    /// Registered classes in the fixed dependency order, each with a
    /// compare-sorted instance snapshot. Classes not yet registered are
    /// skipped.
    pub fn all_in_order(&self) -> Vec<(Arc<ClassEntry>, Vec<Arc<dyn ConfObject>>)> {
        CLASS_ORDER
            .iter()
            .filter_map(|name| self.classes.find(*name).ok())
            .map(|entry| {
                let objs = entry.sorted_objects();
                (entry, objs)
            })
            .collect()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<ClassRegistry> {
        static GLOBAL: std::sync::OnceLock<Arc<ClassRegistry>> = std::sync::OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ClassRegistry::new())))
    }
}

/// The stock implementation of [`ClassHooks`] for attribute-set backed
/// classes. One instance per class, holding the class's instance map.
pub struct ClassDef<A: Attrs> {
    name: &'static str,
    instances: Arc<StrMap<Arc<dyn ConfObject>>>,
    _marker: std::marker::PhantomData<fn() -> A>,
}

impl<A: Attrs> ClassDef<A> {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            instances: Arc::new(StrMap::new()),
            _marker: std::marker::PhantomData,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn instances(&self) -> &Arc<StrMap<Arc<dyn ConfObject>>> {
        &self.instances
    }

    /// The registry entry for this class.
    pub fn entry(self: &Arc<Self>) -> ClassEntry {
        ClassEntry {
            name: self.name.to_string(),
            instances: Arc::clone(&self.instances),
            hooks: Arc::clone(self) as Arc<dyn ClassHooks>,
        }
    }

    /// Downcast a type-erased object back to this class's concrete
    /// type. A foreign object is `InvalidObject`.
    pub fn concrete(&self, obj: &Arc<dyn ConfObject>) -> Result<Arc<ConfObj<A>>> {
        Arc::clone(obj)
            .as_any_arc()
            .downcast::<ConfObj<A>>()
            .map_err(|_| Error::InvalidObject)
    }

    /// Find an instance by full name.
    pub fn get(&self, name: &str) -> Result<Arc<ConfObj<A>>> {
        let obj = self.instances.find(name)?;
        self.concrete(&obj)
    }

    /// Create a new instance, transaction-scoped when `state` is
    /// `Atomic`.
    pub fn create(&self, state: InterpState, name: &str, attrs: A) -> Result<Arc<ConfObj<A>>> {
        let obj = ConfObj::new(name, attrs, state == InterpState::Atomic);
        let erased: Arc<dyn ConfObject> = Arc::clone(&obj) as Arc<dyn ConfObject>;
        self.instances.add(name.to_string(), erased)?;
        Ok(obj)
    }
}

impl<A: Attrs> std::fmt::Debug for ClassDef<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .finish()
    }
}

impl<A: Attrs> ClassHooks for ClassDef<A> {
    fn update(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        _result: &mut ResultBuf,
    ) -> Result<()> {
        let concrete = self.concrete(obj)?;
        if concrete.apply(state)? {
            let _ = self.instances.delete(&concrete.full_name());
        }
        Ok(())
    }

    fn enable(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        do_set: bool,
        new_enabled: Option<bool>,
    ) -> Result<bool> {
        let concrete = self.concrete(obj)?;
        if do_set {
            concrete.set_enabled(state, new_enabled.ok_or(Error::InvalidArgs)?);
        }
        Ok(concrete.enabled())
    }

    fn serialize(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        out: &mut String,
    ) -> Result<()> {
        let concrete = self.concrete(obj)?;
        out.push_str(self.name);
        out.push(' ');
        out.push_str(&concrete.full_name());
        concrete.effective(state).serialize_args(out);
        out.push('\n');
        Ok(())
    }

    fn destroy(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        _result: &mut ResultBuf,
    ) -> Result<()> {
        let concrete = self.concrete(obj)?;
        if state == InterpState::Atomic {
            concrete.mark_delete();
        } else {
            let _ = self.instances.delete(&concrete.full_name());
        }
        Ok(())
    }

    fn duplicate(&self, obj: &Arc<dyn ConfObject>, dst_namespace: &str) -> Result<()> {
        let concrete = self.concrete(obj)?;
        let full_name = concrete.full_name();
        let (_, bare) = split_name(&full_name);
        let dst_name = crate::object::scoped_name(dst_namespace, bare);
        let copy = ConfObj::new(dst_name.clone(), concrete.current(), false);
        copy.set_enabled(InterpState::AutoCommit, concrete.enabled());
        self.instances
            .add(dst_name, copy as Arc<dyn ConfObject>)
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "class_tests.rs"]
mod tests;
