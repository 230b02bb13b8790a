// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The switch's object classes.
//!
//! Every class pairs a typed attribute set with the stock
//! [`ClassDef`] hooks and a shared command handler, so `bridge br0
//! dpid 1`, `bridge br0 enable`, and `bridge br0 destroy` behave the
//! same across classes. Classes register in dependency order at
//! startup.

pub mod bridge;
pub mod channel;
pub mod controller;
pub mod interface;
pub mod policer;
pub mod policer_action;
pub mod port;
pub mod queue;

use std::sync::Arc;

use syd_core::error::{Error, Result};

use crate::class::{ClassDef, ClassEntry, ClassHooks};
use crate::interp::{CommandFn, Interp, InterpCore, InterpState};
use crate::object::Attrs;
use crate::results::ResultBuf;

/// Build the shared command handler for one class.
pub fn class_command<A: Attrs>(def: Arc<ClassDef<A>>) -> CommandFn {
    Arc::new(
        move |_core: &mut InterpCore,
              state: InterpState,
              argv: &[String],
              _class: Option<&ClassEntry>,
              result: &mut ResultBuf| {
            handle_class_command(&def, state, argv, result)
        },
    )
}

fn handle_class_command<A: Attrs>(
    def: &Arc<ClassDef<A>>,
    state: InterpState,
    argv: &[String],
    result: &mut ResultBuf,
) -> Result<()> {
    let class_name = def.name();
    let Some(obj_name) = argv.get(1) else {
        result.set_error(
            Error::InvalidArgs,
            &format!("usage: {class_name} <name> [args...]."),
        );
        return Err(Error::InvalidArgs);
    };
    let rest = &argv[2..];
    let existing = def.get(obj_name).ok();

    match rest.first().map(String::as_str) {
        None => {
            // Bare `<class> <name>` creates the object if missing.
            if existing.is_none() {
                def.create(state, obj_name, A::default())?;
            }
            result.set_ok();
            Ok(())
        }
        Some("enable") | Some("disable") => {
            let Some(obj) = existing else {
                return not_found(result, class_name, obj_name);
            };
            obj.set_enabled(state, rest[0] == "enable");
            result.set_ok();
            Ok(())
        }
        Some("destroy") => {
            let Some(_) = existing else {
                return not_found(result, class_name, obj_name);
            };
            let erased = def.instances().find(obj_name.as_str())?;
            def.destroy(state, &erased, result)?;
            result.set_ok();
            Ok(())
        }
        Some("show") => {
            let Some(_) = existing else {
                return not_found(result, class_name, obj_name);
            };
            let erased = def.instances().find(obj_name.as_str())?;
            let mut out = String::new();
            def.serialize(state, &erased, &mut out)?;
            result.set(out.trim_end().to_string());
            Ok(())
        }
        Some(_) => {
            // `key value` pairs: configure, creating on first mention.
            let obj = match existing {
                Some(obj) => obj,
                None => def.create(state, obj_name, A::default())?,
            };
            let mut pairs = rest.chunks_exact(2);
            for pair in pairs.by_ref() {
                let (key, value) = (&pair[0], &pair[1]);
                if let Err(e) = obj.modify(state, |attrs| attrs.set(key, value)) {
                    result.set_error(
                        e,
                        &format!("can't set {class_name} attribute '{key}' = '{value}'."),
                    );
                    return Err(e);
                }
            }
            if !pairs.remainder().is_empty() {
                result.set_error(
                    Error::InvalidArgs,
                    &format!("attribute '{}' has no value.", pairs.remainder()[0]),
                );
                return Err(Error::InvalidArgs);
            }
            result.set_ok();
            Ok(())
        }
    }
}

fn not_found(result: &mut ResultBuf, class_name: &str, obj_name: &str) -> Result<()> {
    result.set_error(
        Error::NotFound,
        &format!("{class_name} '{obj_name}' not found."),
    );
    Err(Error::NotFound)
}

/// Register every class and its command verb on `interp`.
pub fn register_all(interp: &Interp) -> Result<()> {
    register_class(interp, policer_action::class_def())?;
    register_class(interp, policer::class_def())?;
    register_class(interp, queue::class_def())?;
    register_class(interp, interface::class_def())?;
    register_class(interp, port::class_def())?;
    register_class(interp, channel::class_def())?;
    register_class(interp, controller::class_def())?;
    register_class(interp, bridge::class_def())?;
    Ok(())
}

fn register_class<A: Attrs>(interp: &Interp, def: Arc<ClassDef<A>>) -> Result<()> {
    let registry = interp.with_core(|core| Arc::clone(core.classes()));
    registry.register(def.entry())?;
    interp.register_command(def.name(), class_command(def))
}

/// Append a ` key value` pair.
pub(crate) fn push_arg(out: &mut String, key: &str, value: impl std::fmt::Display) {
    out.push(' ');
    out.push_str(key);
    out.push(' ');
    out.push_str(&value.to_string());
}

#[cfg(test)]
#[path = "classes_tests.rs"]
mod tests;
