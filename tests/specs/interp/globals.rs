// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide registries are shared between interpreters.

use serial_test::serial;

use syd_datastore::configurator::ConfiguratorRegistry;
use syd_datastore::{ClassRegistry, Interp};

#[test]
#[serial]
fn global_registries_are_process_wide() {
    let registry = ClassRegistry::global();
    syd_datastore::classes::register_all(&Interp::new())
        .expect("first global registration succeeds");

    // A second interpreter over the globals sees the same classes.
    let other = Interp::new();
    let names: Vec<String> = other
        .with_core(|c| c.classes().all_in_order())
        .iter()
        .map(|(e, _)| e.name.clone())
        .collect();
    assert_eq!(names.len(), 8);
    assert!(registry.find("bridge").is_ok());

    // Re-registration is refused.
    assert!(syd_datastore::classes::register_all(&Interp::new()).is_err());
}

#[test]
#[serial]
fn global_configurator_lock_is_a_singleton() {
    let configurators = ConfiguratorRegistry::global();
    let _ = configurators.register("spec-a");
    let _ = configurators.register("spec-b");

    configurators.lock("spec-a").unwrap();
    assert!(configurators.lock("spec-b").is_err());
    configurators.unlock("spec-a").unwrap();
    configurators.lock("spec-b").unwrap();
    configurators.unlock("spec-b").unwrap();
}
