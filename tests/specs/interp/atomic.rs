// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic blocks: snapshot lifecycle, commit, abort, and rollback on
//! commit failure.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::prelude::{count, eval, interp, show, CONF};
use syd_core::error::{Error, Result};
use syd_datastore::classes;
use syd_datastore::configurator::ConfiguratorRegistry;
use syd_datastore::{
    ClassEntry, ClassHooks, ClassRegistry, ConfObject, Interp, InterpState, ResultBuf,
};

fn template(dir: &tempfile::TempDir) -> String {
    dir.path().join("snap").display().to_string()
}

fn snapshot_exists(dir: &tempfile::TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().any(|e| {
        e.unwrap()
            .file_name()
            .to_string_lossy()
            .starts_with("snap")
    })
}

#[test]
fn commit_happy_path() {
    let interp = interp();
    let dir = tempfile::tempdir().unwrap();

    let (ret, _) = eval(&interp, &format!("atomic-begin {}", template(&dir)));
    ret.unwrap();
    assert_eq!(interp.state(), InterpState::Atomic);
    assert!(snapshot_exists(&dir));

    let (ret, _) = eval(&interp, "port p0 number 1");
    ret.unwrap();
    let (ret, _) = eval(&interp, "commit");
    ret.unwrap();

    assert_eq!(interp.state(), InterpState::AutoCommit);
    assert!(!snapshot_exists(&dir));
    assert_eq!(count(&interp, "port"), 1);
    assert!(show(&interp, "port", "p0").contains("number 1"));
}

#[test]
fn abort_discards_block() {
    let interp = interp();
    let dir = tempfile::tempdir().unwrap();

    let (ret, _) = eval(&interp, "queue q0 priority 3");
    ret.unwrap();
    let (ret, _) = eval(&interp, &format!("atomic-begin {}", template(&dir)));
    ret.unwrap();
    let (ret, _) = eval(&interp, "queue q0 priority 9\nqueue q1\n");
    ret.unwrap();
    let (ret, _) = eval(&interp, "abort");
    ret.unwrap();

    assert_eq!(interp.state(), InterpState::AutoCommit);
    assert!(!snapshot_exists(&dir));
    assert_eq!(count(&interp, "queue"), 1);
    assert!(show(&interp, "queue", "q0").contains("priority 3"));
}

/// Stock port hooks, except the finalizing commit pass fails for one
/// named victim.
struct FailSecondPass {
    inner: Arc<syd_datastore::class::ClassDef<classes::port::PortAttrs>>,
    victim: String,
}

impl ClassHooks for FailSecondPass {
    fn update(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        result: &mut ResultBuf,
    ) -> Result<()> {
        if state == InterpState::Committed && obj.full_name() == self.victim {
            result.set_error(Error::InvalidArgs, "dataplane refused the update.");
            return Err(Error::InvalidArgs);
        }
        self.inner.update(state, obj, result)
    }

    fn enable(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        do_set: bool,
        new_enabled: Option<bool>,
    ) -> Result<bool> {
        self.inner.enable(state, obj, do_set, new_enabled)
    }

    fn serialize(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        out: &mut String,
    ) -> Result<()> {
        self.inner.serialize(state, obj, out)
    }

    fn destroy(
        &self,
        state: InterpState,
        obj: &Arc<dyn ConfObject>,
        result: &mut ResultBuf,
    ) -> Result<()> {
        self.inner.destroy(state, obj, result)
    }

    fn compare(&self, a: &Arc<dyn ConfObject>, b: &Arc<dyn ConfObject>) -> Ordering {
        self.inner.compare(a, b)
    }

    fn duplicate(&self, obj: &Arc<dyn ConfObject>, dst_namespace: &str) -> Result<()> {
        self.inner.duplicate(obj, dst_namespace)
    }
}

fn interp_with_failing_port() -> Interp {
    let classes_reg = Arc::new(ClassRegistry::new());
    let configurators = Arc::new(ConfiguratorRegistry::new());
    configurators.register(CONF).unwrap();
    let interp = Interp::with_registries(classes_reg, configurators);
    syd_datastore::commands::register_builtins(&interp).unwrap();

    let def = classes::port::class_def();
    let registry = interp.with_core(|c| Arc::clone(c.classes()));
    registry
        .register(ClassEntry {
            name: classes::port::CLASS_NAME.to_string(),
            instances: Arc::clone(def.instances()),
            hooks: Arc::new(FailSecondPass {
                inner: Arc::clone(&def),
                victim: "p0".to_string(),
            }),
        })
        .unwrap();
    interp
        .register_command(classes::port::CLASS_NAME, classes::class_command(def))
        .unwrap();
    interp
}

#[test]
fn commit_failure_rolls_back_to_pre_begin_state() {
    let interp = interp_with_failing_port();
    let dir = tempfile::tempdir().unwrap();

    let (ret, _) = eval(&interp, "port p0 number 1");
    ret.unwrap();
    let (ret, _) = eval(&interp, &format!("atomic-begin {}", template(&dir)));
    ret.unwrap();
    let (ret, _) = eval(&interp, "port p0 number 9");
    ret.unwrap();

    let (ret, result) = eval(&interp, "commit");
    assert_eq!(ret, Err(Error::InvalidArgs));

    // Final state AutoCommit, mutation reverted, snapshot gone, first
    // error string preserved.
    assert_eq!(interp.state(), InterpState::AutoCommit);
    assert!(!snapshot_exists(&dir));
    assert!(result.as_str().contains("dataplane refused the update."));
    assert!(show(&interp, "port", "p0").contains("number 1"));
}
