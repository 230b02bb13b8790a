// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error surfacing: unclosed quotes, unknown verbs, preload
//! tolerance.

use crate::prelude::{count, eval, interp};
use syd_core::Error;
use syd_datastore::InterpState;

#[test]
fn quote_not_closed_leaves_state_untouched() {
    let interp = interp();
    let (ret, _) = eval(&interp, "port \"p");
    assert_eq!(ret, Err(Error::QuoteNotClosed));
    assert_eq!(count(&interp, "port"), 0);
    assert_eq!(interp.state(), InterpState::AutoCommit);
}

#[test]
fn unknown_verb_is_not_found_with_message() {
    let interp = interp();
    let (ret, result) = eval(&interp, "frobnicate all");
    assert_eq!(ret, Err(Error::NotFound));
    let v: serde_json::Value = serde_json::from_str(result.as_str()).unwrap();
    assert_eq!(v["ret"], "NOT_FOUND");
    assert_eq!(v["data"], "'frobnicate' command not found.");
}

#[test]
fn preload_swallows_unknown_verbs_and_continues() {
    let interp = interp();
    interp.with_core(|c| c.set_state(InterpState::Preload));
    let (ret, _) = eval(&interp, "unknown-verb arg");
    ret.unwrap();

    // The loop keeps going: later statements still apply.
    let (ret, _) = eval(&interp, "unknown-verb arg\nbridge br0\nstill-unknown x\n");
    ret.unwrap();
    assert_eq!(count(&interp, "bridge"), 1);
}

#[test]
fn file_errors_carry_position() {
    let interp = interp();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.conf");
    std::fs::write(&path, "bridge br0\n\nport p0 \\\nnumber oops\n").unwrap();

    let mut result = syd_datastore::ResultBuf::new();
    let ret = interp.eval_file(crate::prelude::CONF, &path, false, &mut result);
    assert_eq!(ret, Err(Error::InvalidArgs));

    let v: serde_json::Value = serde_json::from_str(result.as_str()).unwrap();
    // The continuation line ends on physical line 4.
    assert_eq!(v["line"], 4);
    assert!(v["file"].as_str().unwrap().contains("bad.conf"));
}
