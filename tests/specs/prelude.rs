// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the interpreter specs.

use std::sync::Arc;

use syd_datastore::classes;
use syd_datastore::commands;
use syd_datastore::configurator::ConfiguratorRegistry;
use syd_datastore::{ClassRegistry, Interp, InterpState, ResultBuf};

pub const CONF: &str = "spec-conf";

/// A fully wired interpreter over private registries.
pub fn interp() -> Interp {
    let classes_reg = Arc::new(ClassRegistry::new());
    let configurators = Arc::new(ConfiguratorRegistry::new());
    configurators.register(CONF).unwrap();
    let interp = Interp::with_registries(classes_reg, configurators);
    commands::register_builtins(&interp).unwrap();
    classes::register_all(&interp).unwrap();
    interp
}

/// Evaluate `input`, returning the interpreter result and buffer.
pub fn eval(interp: &Interp, input: &str) -> (syd_core::Result<()>, ResultBuf) {
    let mut result = ResultBuf::new();
    let ret = interp.eval_string(CONF, input, &mut result);
    (ret, result)
}

/// Serialized text form of one object.
pub fn show(interp: &Interp, class: &str, name: &str) -> String {
    let def = interp.with_core(|c| c.classes().find(class)).unwrap();
    let obj = def.instances.find(name).unwrap();
    let mut out = String::new();
    def.hooks
        .serialize(InterpState::AutoCommit, &obj, &mut out)
        .unwrap();
    out.trim_end().to_string()
}

/// Count of live instances of one class.
pub fn count(interp: &Interp, class: &str) -> usize {
    interp
        .with_core(|c| c.classes().get_objects(class, false))
        .unwrap()
        .len()
}
