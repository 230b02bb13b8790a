// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, configuration load, shutdown.
//!
//! Startup walks the global state tracker from `Initializing` to
//! `Started`: pidfile lock, interpreter construction, module
//! registration, then the two-pass configuration load (preload first so
//! the file may reference commands that register later).

use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use syd_core::gstate::{self, GlobalState};
use syd_core::CalloutTable;
use syd_datastore::{
    classes, commands, ClassEntry, Interp, InterpCore, InterpState, ResultBuf,
};

use crate::config::Config;

/// Configurator identity of the startup file loader.
pub const STARTUP_CONFIGURATOR: &str = "startup-config";

/// Errors on the daemon startup/shutdown path.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("another sydd instance holds {0}")]
    AlreadyRunning(String),
    #[error("bad daemon.toml: {0}")]
    BadConfig(String),
    #[error("datastore error: {0}")]
    Datastore(#[from] syd_core::Error),
    #[error("configuration load failed: {0}")]
    ConfigLoad(String),
}

/// Live daemon state.
pub struct Daemon {
    pub config: Config,
    // NOTE(lifetime): held to keep the exclusive pidfile lock
    #[allow(dead_code)]
    lock_file: File,
    pub interp: Arc<Interp>,
    pub callouts: Arc<CalloutTable>,
}

/// Current log level, adjustable through the `log` command and
/// serialized with the configuration.
static LOG_LEVEL: Mutex<Option<String>> = Mutex::new(None);

fn log_level() -> String {
    LOG_LEVEL.lock().clone().unwrap_or_else(|| "info".to_string())
}

/// Start the daemon: pidfile, interpreter, modules, configuration.
pub fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    let tracker = gstate::global();
    tracker.set(GlobalState::Initializing)?;

    std::fs::create_dir_all(&config.run_dir)?;
    let lock_file = acquire_pidfile(config)?;

    let interp = Arc::new(Interp::new());
    register_modules(&interp)?;
    tracker.set(GlobalState::Initialized)?;

    tracker.set(GlobalState::Starting)?;
    if let Some(path) = &config.config_file {
        load_configuration(&interp, path)?;
    }

    let callouts = Arc::new(CalloutTable::new());
    register_callouts(&callouts);

    tracker.set(GlobalState::Started)?;
    info!(run_dir = %config.run_dir.display(), "daemon started");

    Ok(Daemon {
        config: config.clone(),
        lock_file,
        interp,
        callouts,
    })
}

/// Stop the daemon: interpreter teardown and pidfile removal.
pub fn shutdown(daemon: &Daemon) -> Result<(), LifecycleError> {
    let tracker = gstate::global();
    tracker.set(GlobalState::ShuttingDown)?;

    daemon.interp.shutdown()?;
    daemon.interp.destroy()?;

    if let Err(e) = std::fs::remove_file(&daemon.config.pid_path) {
        warn!(error = %e, "pidfile removal failed");
    }

    tracker.set(GlobalState::Shutdown)?;
    tracker.set(GlobalState::Finalizing)?;
    tracker.set(GlobalState::Finalized)?;
    info!("daemon stopped");
    Ok(())
}

fn acquire_pidfile(config: &Config) -> Result<File, LifecycleError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&config.pid_path)?;
    if file.try_lock_exclusive().is_err() {
        return Err(LifecycleError::AlreadyRunning(
            config.pid_path.display().to_string(),
        ));
    }
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;
    Ok(file)
}

/// Register commands, classes, the startup configurator, and the
/// global-knob serializers.
fn register_modules(interp: &Interp) -> Result<(), LifecycleError> {
    commands::register_builtins(interp)?;
    classes::register_all(interp)?;

    interp.with_core(|core| core.configurators().register(STARTUP_CONFIGURATOR))?;

    // The `log` knob: a non-class command with its own serializer.
    interp.register_command(
        "log",
        Arc::new(
            |_core: &mut InterpCore,
             _state: InterpState,
             argv: &[String],
             _class: Option<&ClassEntry>,
             result: &mut ResultBuf| {
                match (argv.get(1).map(String::as_str), argv.get(2)) {
                    (Some("level"), Some(level)) => {
                        *LOG_LEVEL.lock() = Some(level.clone());
                        result.set_ok();
                        Ok(())
                    }
                    _ => {
                        result.set_error(syd_core::Error::InvalidArgs, "usage: log level <level>.");
                        Err(syd_core::Error::InvalidArgs)
                    }
                }
            },
        ),
    )?;
    interp.register_global_serializer(
        "log",
        Arc::new(|out: &mut String| {
            out.push_str(&format!("log level {}\n", log_level()));
            Ok(())
        }),
    );
    Ok(())
}

/// Two-pass configuration load under the configurator lock: preload
/// tolerates verbs of modules that register later, the second pass is
/// strict.
fn load_configuration(interp: &Arc<Interp>, path: &std::path::Path) -> Result<(), LifecycleError> {
    let configurators = interp.with_core(|core| Arc::clone(core.configurators()));
    configurators.lock(STARTUP_CONFIGURATOR)?;

    let mut result = ResultBuf::new();
    let ret = interp
        .eval_file(STARTUP_CONFIGURATOR, path, true, &mut result)
        .and_then(|()| {
            result.clear();
            interp.eval_file(STARTUP_CONFIGURATOR, path, false, &mut result)
        });

    configurators.unlock(STARTUP_CONFIGURATOR)?;

    match ret {
        Ok(()) => {
            info!(file = %path.display(), "configuration loaded");
            Ok(())
        }
        Err(e) => {
            let detail = if result.is_empty() {
                e.to_string()
            } else {
                result.take()
            };
            Err(LifecycleError::ConfigLoad(detail))
        }
    }
}

/// Periodic housekeeping driven by the main loop tick.
fn register_callouts(callouts: &Arc<CalloutTable>) {
    let uptime = syd_core::statistic::create("daemon.tick")
        .ok()
        .or_else(|| syd_core::statistic::find("daemon.tick").ok());
    let started = std::time::Instant::now();
    callouts.register(
        "uptime-log",
        Duration::from_secs(60),
        Some(Duration::from_secs(60)),
        Box::new(move || {
            if let Some(stat) = &uptime {
                stat.record(started.elapsed().as_secs() as i64);
            }
            tracing::debug!(uptime_secs = started.elapsed().as_secs(), "daemon alive");
            Ok(())
        }),
    );
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
