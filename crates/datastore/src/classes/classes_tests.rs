// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::class::ClassRegistry;
use crate::classes;
use crate::commands;
use crate::configurator::ConfiguratorRegistry;
use crate::interp::{Interp, InterpState};
use crate::results::ResultBuf;
use syd_core::error::Error;

const CONF: &str = "test-conf";

fn test_interp() -> Interp {
    let classes_reg = Arc::new(ClassRegistry::new());
    let configurators = Arc::new(ConfiguratorRegistry::new());
    configurators.register(CONF).unwrap();
    let interp = Interp::with_registries(classes_reg, configurators);
    commands::register_builtins(&interp).unwrap();
    classes::register_all(&interp).unwrap();
    interp
}

fn eval(interp: &Interp, input: &str) -> (syd_core::Result<()>, ResultBuf) {
    let mut result = ResultBuf::new();
    let ret = interp.eval_string(CONF, input, &mut result);
    (ret, result)
}

#[test]
fn all_eight_classes_register() {
    let interp = test_interp();
    let in_order = interp.with_core(|c| c.classes().all_in_order());
    let names: Vec<String> = in_order.iter().map(|(e, _)| e.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            "policer-action",
            "policer",
            "queue",
            "interface",
            "port",
            "channel",
            "controller",
            "bridge"
        ]
    );
}

#[test]
fn bare_mention_creates_object() {
    let interp = test_interp();
    let (ret, result) = eval(&interp, "queue q0");
    ret.unwrap();
    assert_eq!(result.as_str(), r#"{"ret":"OK"}"#);
    assert_eq!(
        interp
            .with_core(|c| c.classes().get_objects("queue", false))
            .unwrap()
            .len(),
        1
    );
    // Mentioning it again is not an error.
    let (ret, _) = eval(&interp, "queue q0");
    ret.unwrap();
}

#[test]
fn attribute_pairs_configure_and_create() {
    let interp = test_interp();
    let (ret, _) = eval(
        &interp,
        "policer pol0 action discard-act bandwidth-limit 1500k burst-size-limit 1500 bandwidth-percent 50",
    );
    ret.unwrap();

    let def = interp.with_core(|c| c.classes().find("policer")).unwrap();
    let obj = def.instances.find("pol0").unwrap();
    let mut out = String::new();
    def.hooks
        .serialize(InterpState::AutoCommit, &obj, &mut out)
        .unwrap();
    assert_eq!(
        out,
        "policer pol0 action discard-act bandwidth-limit 1500000 burst-size-limit 1500 bandwidth-percent 50\n"
    );
}

#[test]
fn unknown_attribute_is_rejected() {
    let interp = test_interp();
    let (ret, result) = eval(&interp, "bridge br0 color blue");
    assert_eq!(ret, Err(Error::NotFound));
    assert!(result.as_str().contains("can't set bridge attribute"));
}

#[test]
fn bad_attribute_value_is_rejected() {
    let interp = test_interp();
    let (ret, _) = eval(&interp, "port p0 number not-a-number");
    assert_eq!(ret, Err(Error::InvalidArgs));
    let (ret, _) = eval(&interp, "channel ch0 dst-port 70000");
    assert_eq!(ret, Err(Error::OutOfRange));
    let (ret, _) = eval(&interp, "controller c0 role emperor");
    assert_eq!(ret, Err(Error::InvalidArgs));
}

#[test]
fn dangling_attribute_key_is_rejected() {
    let interp = test_interp();
    let (ret, result) = eval(&interp, "bridge br0 dpid 1 fail-mode");
    assert_eq!(ret, Err(Error::InvalidArgs));
    assert!(result.as_str().contains("'fail-mode' has no value"));
}

#[test]
fn enable_disable_subcommands() {
    let interp = test_interp();
    let (ret, _) = eval(&interp, "bridge br0");
    ret.unwrap();
    let (ret, _) = eval(&interp, "bridge br0 enable");
    ret.unwrap();

    let def = interp.with_core(|c| c.classes().find("bridge")).unwrap();
    let obj = def.instances.find("br0").unwrap();
    assert!(def
        .hooks
        .enable(InterpState::AutoCommit, &obj, false, None)
        .unwrap());

    let (ret, _) = eval(&interp, "bridge br0 disable");
    ret.unwrap();
    assert!(!def
        .hooks
        .enable(InterpState::AutoCommit, &obj, false, None)
        .unwrap());
}

#[test]
fn enable_of_missing_object_fails() {
    let interp = test_interp();
    let (ret, result) = eval(&interp, "bridge ghost enable");
    assert_eq!(ret, Err(Error::NotFound));
    assert!(result.as_str().contains("bridge 'ghost' not found."));
}

#[test]
fn destroy_subcommand_removes_object() {
    let interp = test_interp();
    let (ret, _) = eval(&interp, "interface if0");
    ret.unwrap();
    let (ret, _) = eval(&interp, "interface if0 destroy");
    ret.unwrap();
    assert!(interp
        .with_core(|c| c.classes().get_objects("interface", false))
        .unwrap()
        .is_empty());
}

#[test]
fn show_prints_serialized_form() {
    let interp = test_interp();
    let (ret, _) = eval(&interp, "bridge br0 dpid 42 port p0");
    ret.unwrap();
    let (ret, result) = eval(&interp, "bridge br0 show");
    ret.unwrap();
    assert_eq!(result.as_str(), "bridge br0 dpid 42 fail-mode secure port p0");
}

#[test]
fn multi_valued_attributes_dedupe() {
    let interp = test_interp();
    let (ret, _) = eval(&interp, "bridge br0 port p0 port p0 port p1");
    ret.unwrap();
    let (_, result) = eval(&interp, "bridge br0 show");
    let shown = result.as_str();
    assert_eq!(shown.matches("port p0").count(), 1);
    assert!(shown.contains("port p1"));
}

#[test]
fn class_defaults_are_sensible() {
    let interp = test_interp();
    for stmt in [
        "policer-action act0",
        "queue q0",
        "interface if0",
        "channel ch0",
        "controller c0",
    ] {
        let (ret, _) = eval(&interp, stmt);
        ret.unwrap();
    }
    let (_, result) = eval(&interp, "channel ch0 show");
    assert_eq!(
        result.as_str(),
        "channel ch0 dst-addr 127.0.0.1 dst-port 6633 protocol tcp"
    );
    let (_, result) = eval(&interp, "queue q0 show");
    assert_eq!(result.as_str(), "queue q0 type single-rate id 0 priority 0");
}

#[test]
fn missing_object_name_is_usage_error() {
    let interp = test_interp();
    let (ret, result) = eval(&interp, "bridge");
    assert_eq!(ret, Err(Error::InvalidArgs));
    assert!(result.as_str().contains("usage: bridge"));
}
