// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered object walks: update-all, destroy, duplicate.
//!
//! Forward walks visit classes in [`crate::class::CLASS_ORDER`] with
//! instances compare-sorted; the destroy walk reverses both levels so
//! dependents go first. Every walk short-circuits on the first error.

use syd_core::error::Result;

use crate::interp::InterpCore;
use crate::object::split_name;
use crate::results::ResultBuf;

impl InterpCore {
    /// Run every object's update hook for the current interpreter
    /// state, classes in fixed order, instances compare-sorted.
    pub(crate) fn update_all_objs(&mut self, result: &mut ResultBuf) -> Result<()> {
        result.clear();
        let all = self.classes().all_in_order();
        let state = self.state();
        for (entry, objs) in &all {
            for obj in objs {
                entry.hooks.update(state, obj, result)?;
            }
        }
        Ok(())
    }

    /// Destroy objects in reverse dependency order; within a class, in
    /// reverse compare order. A namespace restricts the walk to objects
    /// named `namespace:...`.
    pub(crate) fn destroy_obj_locked(
        &mut self,
        namespace: Option<&str>,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let all = self.classes().all_in_order();
        let state = self.state();
        let prefix = namespace.map(|ns| format!("{ns}:"));
        for (entry, objs) in all.iter().rev() {
            for obj in objs.iter().rev() {
                if let Some(prefix) = &prefix {
                    if !obj.full_name().starts_with(prefix.as_str()) {
                        continue;
                    }
                }
                entry.hooks.destroy(state, obj, result)?;
            }
        }
        Ok(())
    }

    /// Copy every object of `src_namespace` (the default namespace when
    /// `None`) into `dst_namespace` via the class duplicate hooks.
    /// Classes are walked in reverse order, instances forward.
    pub(crate) fn duplicate_obj_locked(
        &mut self,
        src_namespace: Option<&str>,
        dst_namespace: &str,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let all = self.classes().all_in_order();
        let src = src_namespace.unwrap_or("");
        for (entry, objs) in all.iter().rev() {
            for obj in objs {
                let full = obj.full_name();
                let (ns, _) = split_name(&full);
                if ns != src {
                    continue;
                }
                if let Err(e) = entry.hooks.duplicate(obj, dst_namespace) {
                    result.set_error(e, &format!("can't duplicate '{full}'."));
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}
