// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The configuration interpreter.
//!
//! [`Interp`] is the public, lock-acquiring surface; every method takes
//! the interpreter mutex and delegates to [`InterpCore`], the locked
//! body that internal code and command handlers operate on directly.
//! That split replaces the recursive mutex of older designs: re-entry
//! from a handler is simply a method call on the core it was handed.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use syd_core::error::{Error, Result};
use syd_core::hashmap::{StrMap, WordMap};

use crate::class::{ClassEntry, ClassRegistry};
use crate::configurator::ConfiguratorRegistry;
use crate::context::{ConfigType, FileContext};
use crate::results::ResultBuf;

/// Interpreter states. `AutoCommit` applies mutations immediately;
/// `Atomic` stages them for the two-phase commit walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpState {
    #[default]
    AutoCommit,
    Atomic,
    Committing,
    Committed,
    CommitFailure,
    Aborting,
    Aborted,
    Rollbacking,
    Rollbacked,
    Dryrun,
    Preload,
    Shutdown,
    Destroying,
}

impl std::fmt::Display for InterpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InterpState::AutoCommit => "auto-commit",
            InterpState::Atomic => "atomic",
            InterpState::Committing => "committing",
            InterpState::Committed => "committed",
            InterpState::CommitFailure => "commit-failure",
            InterpState::Aborting => "aborting",
            InterpState::Aborted => "aborted",
            InterpState::Rollbacking => "rollbacking",
            InterpState::Rollbacked => "rollbacked",
            InterpState::Dryrun => "dryrun",
            InterpState::Preload => "preload",
            InterpState::Shutdown => "shutdown",
            InterpState::Destroying => "destroying",
        };
        f.write_str(s)
    }
}

/// Command handler: interpreter core, current state, argv, the class
/// entry when the verb names a registered object class, and the result
/// buffer.
pub type CommandFn = Arc<
    dyn Fn(&mut InterpCore, InterpState, &[String], Option<&ClassEntry>, &mut ResultBuf) -> Result<()>
        + Send
        + Sync,
>;

/// A session currently draining large output through a worker thread.
#[derive(Debug, Clone)]
pub struct BlockingSession {
    pub worker: Arc<std::thread::JoinHandle<()>>,
}

impl BlockingSession {
    pub fn is_live(&self) -> bool {
        !self.worker.is_finished()
    }
}

/// Context of one nested evaluation (file load, stream, auto-load).
#[derive(Debug, Clone, Default)]
pub(crate) struct EvalContext {
    pub filename: Option<String>,
    pub config_type: ConfigType,
    pub session_id: Option<u64>,
    pub lineno: u64,
}

/// The locked interpreter body.
pub struct InterpCore {
    state: InterpState,
    saved_state: InterpState,
    classes: Arc<ClassRegistry>,
    configurators: Arc<ConfiguratorRegistry>,
    commands: StrMap<CommandFn>,
    blocking_sessions: WordMap<BlockingSession>,
    pub(crate) current_configurator: Option<String>,
    pub(crate) is_stream: bool,
    pub(crate) atomic_save_file: Option<PathBuf>,
    pub(crate) contexts: Vec<EvalContext>,
    pub(crate) global_serializers: Vec<(String, GlobalSerializeFn)>,
}

/// Serializer for a non-class global knob (log, datastore, agent, ...).
pub type GlobalSerializeFn = Arc<dyn Fn(&mut String) -> Result<()> + Send + Sync>;

impl std::fmt::Debug for InterpCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpCore")
            .field("state", &self.state)
            .field("saved_state", &self.saved_state)
            .field("current_configurator", &self.current_configurator)
            .field("atomic_save_file", &self.atomic_save_file)
            .finish_non_exhaustive()
    }
}

impl InterpCore {
    fn new(classes: Arc<ClassRegistry>, configurators: Arc<ConfiguratorRegistry>) -> Self {
        Self {
            state: InterpState::AutoCommit,
            saved_state: InterpState::AutoCommit,
            classes,
            configurators,
            commands: StrMap::new(),
            blocking_sessions: WordMap::new(),
            current_configurator: None,
            is_stream: false,
            atomic_save_file: None,
            contexts: Vec::new(),
            global_serializers: Vec::new(),
        }
    }

    pub fn state(&self) -> InterpState {
        self.state
    }

    pub fn saved_state(&self) -> InterpState {
        self.saved_state
    }

    pub fn classes(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    pub fn configurators(&self) -> &Arc<ConfiguratorRegistry> {
        &self.configurators
    }

    /// Force the interpreter state. Embedders use this to enter
    /// `Preload` around early module registration; the transaction
    /// verbs manage every other state themselves.
    pub fn set_state(&mut self, s: InterpState) {
        self.state = s;
    }

    pub(crate) fn save_state(&mut self) {
        self.saved_state = self.state;
    }

    pub(crate) fn restore_state(&mut self) {
        self.state = self.saved_state;
    }

    /// Shutdown and destruction are terminal; nothing runs past them.
    pub fn is_functional(&self) -> bool {
        !matches!(self.state, InterpState::Shutdown | InterpState::Destroying)
    }

    pub(crate) fn check_functional(&self) -> Result<()> {
        if self.is_functional() {
            Ok(())
        } else {
            Err(Error::NotOperational)
        }
    }

    /// Register a command verb.
    pub fn register_command(&mut self, verb: &str, handler: CommandFn) -> Result<()> {
        if verb.is_empty() {
            return Err(Error::InvalidArgs);
        }
        self.commands.add(verb.to_string(), handler)
    }

    pub fn unregister_command(&mut self, verb: &str) -> Result<()> {
        self.commands.delete(verb).map(|_| ())
    }

    pub(crate) fn find_command(&self, verb: &str) -> Result<CommandFn> {
        self.commands.find(verb)
    }

    /// Register a serializer for a non-class global knob; serialization
    /// emits these before any object class, in registration order.
    pub fn register_global_serializer(&mut self, name: &str, f: GlobalSerializeFn) {
        self.global_serializers.push((name.to_string(), f));
    }

    /// Mark a session as draining large output through `worker`.
    pub fn blocking_session_set(&mut self, session_id: u64, session: BlockingSession) {
        let _ = self.blocking_sessions.put(session_id, session);
    }

    pub fn blocking_session_unset(&mut self, session_id: u64) {
        let _ = self.blocking_sessions.delete(&session_id);
    }

    /// True when the current output session must not accept more
    /// statements. Stale records (dead worker) are purged on the way.
    pub(crate) fn is_blocking_session(&mut self) -> bool {
        let Some(ctx) = self.contexts.last() else {
            return false;
        };
        if ctx.config_type != ConfigType::StreamSession {
            return false;
        }
        let Some(id) = ctx.session_id else {
            return false;
        };
        match self.blocking_sessions.find(&id) {
            Ok(bs) if bs.is_live() => true,
            Ok(_) => {
                let _ = self.blocking_sessions.delete(&id);
                false
            }
            Err(_) => false,
        }
    }

    /// Context of the innermost active source.
    pub fn current_file_context(&self) -> FileContext {
        match self.contexts.last() {
            Some(ctx) => FileContext {
                filename: ctx.filename.clone(),
                lineno: ctx.lineno,
                config_type: ctx.config_type,
                session_id: ctx.session_id,
            },
            None => FileContext::default(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.is_stream
    }

    /// Run `f` on behalf of a registered configurator, restoring the
    /// previous attribution afterwards. Unregistered names are
    /// `NotAllowed`.
    pub(crate) fn with_configurator<F, T>(&mut self, name: &str, is_stream: bool, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if !self.configurators.is_registered(name) {
            return Err(Error::NotAllowed);
        }
        let prev_name = self.current_configurator.replace(name.to_string());
        let prev_stream = std::mem::replace(&mut self.is_stream, is_stream);
        let out = f(self);
        self.current_configurator = prev_name;
        self.is_stream = prev_stream;
        out
    }

    pub(crate) fn shutdown_locked(&mut self) -> Result<()> {
        self.check_functional()?;
        self.state = InterpState::Shutdown;
        Ok(())
    }

    pub(crate) fn destroy_locked(&mut self) -> Result<()> {
        if self.state != InterpState::Shutdown {
            return Err(Error::InvalidStateTransition);
        }
        self.state = InterpState::Destroying;
        self.unlink_atomic_save_file();
        Ok(())
    }
}

/// The public interpreter handle. All entry points acquire the
/// interpreter mutex.
#[derive(Debug)]
pub struct Interp {
    core: Mutex<InterpCore>,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// Interpreter over the process-wide registries.
    pub fn new() -> Self {
        Self::with_registries(ClassRegistry::global(), ConfiguratorRegistry::global())
    }

    /// Interpreter over explicit registries (tests, embedding).
    pub fn with_registries(
        classes: Arc<ClassRegistry>,
        configurators: Arc<ConfiguratorRegistry>,
    ) -> Self {
        Self {
            core: Mutex::new(InterpCore::new(classes, configurators)),
        }
    }

    /// Run `f` with the interpreter locked.
    pub fn with_core<T>(&self, f: impl FnOnce(&mut InterpCore) -> T) -> T {
        f(&mut self.core.lock())
    }

    pub fn state(&self) -> InterpState {
        self.core.lock().state()
    }

    pub fn register_command(&self, verb: &str, handler: CommandFn) -> Result<()> {
        self.core.lock().register_command(verb, handler)
    }

    pub fn register_global_serializer(&self, name: &str, f: GlobalSerializeFn) {
        self.core.lock().register_global_serializer(name, f)
    }

    pub fn blocking_session_set(&self, session_id: u64, session: BlockingSession) {
        self.core.lock().blocking_session_set(session_id, session)
    }

    pub fn blocking_session_unset(&self, session_id: u64) {
        self.core.lock().blocking_session_unset(session_id)
    }

    pub fn current_file_context(&self) -> FileContext {
        self.core.lock().current_file_context()
    }

    /// Evaluate a string of statements on behalf of `configurator`.
    pub fn eval_string(
        &self,
        configurator: &str,
        input: &str,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.with_configurator(configurator, false, |core| {
            core.eval_str(input, None, result)
        })
    }

    /// Evaluate a stream source; `interactive` evaluates exactly one
    /// logical line, otherwise the source runs to EOF.
    pub fn eval_source(
        &self,
        configurator: &str,
        src: &mut dyn crate::context::ConfigSource,
        interactive: bool,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.with_configurator(configurator, interactive, |core| {
            core.eval_stream(src, result)
        })
    }

    /// Parse a configuration file. With `preload`, unknown verbs are
    /// swallowed so a file can be parsed before every module has
    /// registered its commands.
    pub fn eval_file(
        &self,
        configurator: &str,
        path: &std::path::Path,
        preload: bool,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.eval_file_locked(configurator, path, preload, result)
    }

    /// Serialize the live state into `path`.
    pub fn save_file(
        &self,
        configurator: &str,
        path: &std::path::Path,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.with_configurator(configurator, false, |core| {
            core.save_file_locked(path, result)
        })
    }

    /// Open an atomic block, snapshotting live state to a temp file
    /// derived from `file_template`.
    pub fn atomic_begin(&self, file_template: &std::path::Path, result: &mut ResultBuf) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.atomic_begin_locked(file_template, result)
    }

    pub fn atomic_commit(&self, result: &mut ResultBuf) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.atomic_commit_locked(result)
    }

    pub fn atomic_abort(&self, result: &mut ResultBuf) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.atomic_abort_locked(result)
    }

    pub fn atomic_rollback(&self, force: bool, result: &mut ResultBuf) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.atomic_rollback_locked(force, result)
    }

    pub fn dryrun_begin(&self) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.dryrun_begin_locked()
    }

    pub fn dryrun_end(&self) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.dryrun_end_locked()
    }

    /// Destroy objects, optionally restricted to one namespace.
    pub fn destroy_obj(&self, namespace: Option<&str>, result: &mut ResultBuf) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.destroy_obj_locked(namespace, result)
    }

    /// Copy objects from one namespace into another (dry-run support).
    pub fn duplicate_obj(
        &self,
        src_namespace: Option<&str>,
        dst_namespace: &str,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut core = self.core.lock();
        core.check_functional()?;
        core.duplicate_obj_locked(src_namespace, dst_namespace, result)
    }

    /// Stop accepting work. Terminal.
    pub fn shutdown(&self) -> Result<()> {
        self.core.lock().shutdown_locked()
    }

    /// Release interpreter resources. Only legal after [`Interp::shutdown`].
    pub fn destroy(&self) -> Result<()> {
        self.core.lock().destroy_locked()
    }
}

#[cfg(test)]
#[path = "interp_tests.rs"]
mod tests;
