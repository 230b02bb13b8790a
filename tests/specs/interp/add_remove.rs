// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simple add/remove: objects appear in their class map and are gone
//! after destroy.

use crate::prelude::{count, eval, interp};
use syd_datastore::InterpState;

#[test]
fn bridge_add_enable_destroy() {
    let interp = interp();

    let (ret, _) = eval(&interp, "bridge br0");
    ret.unwrap();
    let (ret, _) = eval(&interp, "bridge br0 enable");
    ret.unwrap();

    let objs = interp
        .with_core(|c| c.classes().get_objects("bridge", true))
        .unwrap();
    assert_eq!(objs.len(), 1);
    assert_eq!(objs[0].full_name(), "br0");

    let def = interp.with_core(|c| c.classes().find("bridge")).unwrap();
    let enabled = def
        .hooks
        .enable(InterpState::AutoCommit, &objs[0], false, None)
        .unwrap();
    assert!(enabled);

    let (ret, _) = eval(&interp, "destroy bridge br0");
    ret.unwrap();
    assert_eq!(count(&interp, "bridge"), 0);
}

#[test]
fn objects_sort_deterministically() {
    let interp = interp();
    let (ret, _) = eval(&interp, "port p2\nport p0\nport p1\n");
    ret.unwrap();
    let names: Vec<String> = interp
        .with_core(|c| c.classes().get_objects("port", true))
        .unwrap()
        .iter()
        .map(|o| o.full_name())
        .collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
}
