// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in interpreter commands: the atomic block verbs, dry-run,
//! destroy, and configuration save/load.

use std::path::PathBuf;
use std::sync::Arc;

use syd_core::error::{Error, Result};

use crate::class::ClassEntry;
use crate::interp::{CommandFn, Interp, InterpCore, InterpState};
use crate::results::ResultBuf;

/// Namespace dry-run copies live in.
pub const DRYRUN_NAMESPACE: &str = "dryrun";

fn default_snapshot_template() -> PathBuf {
    std::env::temp_dir().join("switchyard-atomic")
}

fn arg_error(result: &mut ResultBuf, msg: &str) -> Result<()> {
    result.set_error(Error::InvalidArgs, msg);
    Err(Error::InvalidArgs)
}

fn cmd_atomic_begin(
    core: &mut InterpCore,
    _state: InterpState,
    argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    let template = argv
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_snapshot_template);
    match core.atomic_begin_locked(&template, result) {
        Ok(()) => {
            result.set_ok();
            Ok(())
        }
        Err(e) => {
            if result.is_empty() {
                result.set_error(e, "can't begin an atomic block.");
            }
            Err(e)
        }
    }
}

fn cmd_commit(
    core: &mut InterpCore,
    _state: InterpState,
    _argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    match core.atomic_commit_locked(result) {
        Ok(()) => {
            result.set_ok();
            Ok(())
        }
        // The buffer already carries the first error string.
        Err(e) => Err(e),
    }
}

fn cmd_abort(
    core: &mut InterpCore,
    _state: InterpState,
    _argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    core.atomic_abort_locked(result)?;
    result.set_ok();
    Ok(())
}

fn cmd_rollback(
    core: &mut InterpCore,
    _state: InterpState,
    argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    let force = matches!(argv.get(1).map(String::as_str), Some("force"));
    core.atomic_rollback_locked(force, result)?;
    result.set_ok();
    Ok(())
}

fn cmd_dryrun_begin(
    core: &mut InterpCore,
    _state: InterpState,
    _argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    core.dryrun_begin_locked()?;
    if let Err(e) = core.duplicate_obj_locked(None, DRYRUN_NAMESPACE, result) {
        // Unwind the half-populated dry-run namespace.
        let mut scratch = ResultBuf::new();
        let _ = core.destroy_obj_locked(Some(DRYRUN_NAMESPACE), &mut scratch);
        let _ = core.dryrun_end_locked();
        return Err(e);
    }
    result.set_ok();
    Ok(())
}

fn cmd_dryrun_end(
    core: &mut InterpCore,
    _state: InterpState,
    _argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    if core.state() != InterpState::Dryrun {
        return Err(Error::InvalidStateTransition);
    }
    core.destroy_obj_locked(Some(DRYRUN_NAMESPACE), result)?;
    core.dryrun_end_locked()?;
    result.set_ok();
    Ok(())
}

fn cmd_destroy(
    core: &mut InterpCore,
    state: InterpState,
    argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    let (Some(class_name), Some(obj_name)) = (argv.get(1), argv.get(2)) else {
        return arg_error(result, "usage: destroy <class> <name>.");
    };
    let entry = match core.classes().find(class_name) {
        Ok(entry) => entry,
        Err(e) => {
            result.set_error(e, &format!("'{class_name}' is not an object class."));
            return Err(e);
        }
    };
    let obj = match entry.instances.find(obj_name.as_str()) {
        Ok(obj) => obj,
        Err(e) => {
            result.set_error(e, &format!("{class_name} '{obj_name}' not found."));
            return Err(e);
        }
    };
    entry.hooks.destroy(state, &obj, result)?;
    result.set_ok();
    Ok(())
}

fn cmd_load(
    core: &mut InterpCore,
    _state: InterpState,
    argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    let Some(path) = argv.get(1) else {
        return arg_error(result, "usage: load <file>.");
    };
    let Some(configurator) = core.current_configurator.clone() else {
        return Err(Error::InvalidArgs);
    };
    core.eval_file_locked(&configurator, std::path::Path::new(path), false, result)?;
    result.set_ok();
    Ok(())
}

fn cmd_save(
    core: &mut InterpCore,
    _state: InterpState,
    argv: &[String],
    _class: Option<&ClassEntry>,
    result: &mut ResultBuf,
) -> Result<()> {
    let Some(path) = argv.get(1) else {
        return arg_error(result, "usage: save <file>.");
    };
    core.save_file_locked(std::path::Path::new(path), result)?;
    result.set_ok();
    Ok(())
}

/// Register every built-in verb on `interp`.
pub fn register_builtins(interp: &Interp) -> Result<()> {
    let builtins: [(&str, CommandFn); 9] = [
        ("atomic-begin", Arc::new(cmd_atomic_begin)),
        ("commit", Arc::new(cmd_commit)),
        ("abort", Arc::new(cmd_abort)),
        ("rollback", Arc::new(cmd_rollback)),
        ("dryrun-begin", Arc::new(cmd_dryrun_begin)),
        ("dryrun-end", Arc::new(cmd_dryrun_end)),
        ("destroy", Arc::new(cmd_destroy)),
        ("load", Arc::new(cmd_load)),
        ("save", Arc::new(cmd_save)),
    ];
    for (verb, handler) in builtins {
        interp.register_command(verb, handler)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
