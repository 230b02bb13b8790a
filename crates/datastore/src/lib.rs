// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! syd-datastore: the configuration interpreter and atomic transaction
//! core of the switch.
//!
//! Configuration sources (files, interactive streams, RPC sessions)
//! feed lines through the [`linereader`], the [`eval`] dispatcher routes
//! statements to command and object-class handlers, and the
//! [`interp`] state machine gates every state-changing operation.
//! `atomic-begin` snapshots the serialized live state to disk so a
//! failed commit can roll back, or in the worst case reload the
//! snapshot from scratch.

pub mod atomic;
pub mod class;
pub mod classes;
pub mod commands;
pub mod configurator;
pub mod context;
pub mod eval;
pub mod interp;
pub mod linereader;
pub mod object;
pub mod results;
pub mod serialize;
pub mod walks;

pub use class::{ClassEntry, ClassHooks, ClassRegistry, CLASS_ORDER};
pub use configurator::ConfiguratorRegistry;
pub use context::{ConfigSource, ConfigType, FileContext, FileSource, SessionSource};
pub use interp::{CommandFn, Interp, InterpCore, InterpState};
pub use object::{Attrs, ConfObj, ConfObject};
pub use results::ResultBuf;
