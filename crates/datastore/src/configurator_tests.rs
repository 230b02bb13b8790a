// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ConfiguratorRegistry;
use syd_core::error::Error;

#[test]
fn register_find_unregister() {
    let reg = ConfiguratorRegistry::new();
    reg.register("file-loader").unwrap();
    assert!(reg.is_registered("file-loader"));
    assert_eq!(reg.register("file-loader"), Err(Error::AlreadyExists));
    reg.unregister("file-loader").unwrap();
    assert!(!reg.is_registered("file-loader"));
    assert_eq!(reg.unregister("file-loader"), Err(Error::NotFound));
}

#[test]
fn register_rejects_empty_name() {
    let reg = ConfiguratorRegistry::new();
    assert_eq!(reg.register(""), Err(Error::InvalidArgs));
}

#[test]
fn lock_is_exclusive() {
    let reg = ConfiguratorRegistry::new();
    reg.register("a").unwrap();
    reg.register("b").unwrap();

    reg.lock("a").unwrap();
    assert_eq!(reg.holder().as_deref(), Some("a"));
    // Re-lock by the holder is idempotent.
    reg.lock("a").unwrap();
    // Another configurator is refused.
    assert_eq!(reg.lock("b"), Err(Error::Busy));

    reg.unlock("a").unwrap();
    reg.lock("b").unwrap();
    assert_eq!(reg.holder().as_deref(), Some("b"));
}

#[test]
fn lock_requires_registration() {
    let reg = ConfiguratorRegistry::new();
    assert_eq!(reg.lock("ghost"), Err(Error::NotFound));
}

#[test]
fn unlock_when_not_locked_is_idempotent() {
    let reg = ConfiguratorRegistry::new();
    reg.register("a").unwrap();
    reg.unlock("a").unwrap();
    reg.unlock("a").unwrap();
}

#[test]
fn unlock_by_non_holder_is_refused() {
    let reg = ConfiguratorRegistry::new();
    reg.register("a").unwrap();
    reg.register("b").unwrap();
    reg.lock("a").unwrap();
    assert_eq!(reg.unlock("b"), Err(Error::NotOwner));
    assert_eq!(reg.holder().as_deref(), Some("a"));
}

#[test]
fn lock_holder_cannot_be_unregistered() {
    let reg = ConfiguratorRegistry::new();
    reg.register("a").unwrap();
    reg.lock("a").unwrap();
    assert_eq!(reg.unregister("a"), Err(Error::Busy));
    reg.unlock("a").unwrap();
    reg.unregister("a").unwrap();
}
