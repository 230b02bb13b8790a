// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Switchyard daemon (sydd)
//!
//! Host process for the configuration interpreter: loads the switch
//! configuration, then sits in a signal-driven main loop until a
//! shutdown is requested.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod lifecycle;

use std::path::PathBuf;
use std::time::Instant;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use syd_core::gstate::{self, GlobalState, ShutdownGrace};

use crate::config::{CliArgs, Config};

const USAGE: &str = "\
USAGE:
    sydd [OPTIONS]

OPTIONS:
    -to <seconds>    Shutdown check interval (default 1)
    -c <file>        Switch configuration file
    -h, --help       Print help information
    -v, --version    Print version information";

fn parse_args() -> Result<Option<CliArgs>, String> {
    let mut cli = CliArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                println!("sydd {}", env!("CARGO_PKG_VERSION"));
                println!("Switchyard daemon - configuration interpreter host");
                println!();
                println!("{USAGE}");
                return Ok(None);
            }
            "--version" | "-V" | "-v" => {
                println!("sydd {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "-to" => {
                let value = args.next().ok_or("'-to' needs a value")?;
                let secs = syd_core::parse::parse_u64(&value)
                    .map_err(|_| format!("bad '-to' value '{value}'"))?;
                cli.shutdown_check_secs = Some(secs);
            }
            "-c" => {
                let value = args.next().ok_or("'-c' needs a value")?;
                cli.config_file = Some(PathBuf::from(value));
            }
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }
    Ok(Some(cli))
}

#[tokio::main]
async fn main() {
    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => return,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.run_dir) {
        eprintln!("error: can't create {}: {e}", config.run_dir.display());
        std::process::exit(1);
    }
    let _log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: can't set up logging: {e}");
            std::process::exit(1);
        }
    };

    info!("starting sydd");

    // Signal handlers go in before any startup work: a shutdown signal
    // delivered while startup is still underway aborts the startup
    // path instead of hitting the default disposition.
    match install_signal_task() {
        Ok(task) => {
            tokio::spawn(task);
        }
        Err(e) => {
            eprintln!("sydd: can't install signal handlers: {e}");
            std::process::exit(1);
        }
    }

    let daemon = match lifecycle::startup(&config) {
        Ok(daemon) => daemon,
        Err(e) => {
            eprintln!("sydd: failed to start: {e}");
            error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_main_loop(&daemon).await {
        error!(error = %e, "main loop failed");
        let _ = lifecycle::shutdown(&daemon);
        std::process::exit(1);
    }

    let forced = matches!(
        gstate::global().shutdown_grace(),
        Some(ShutdownGrace::RightNow)
    );
    if let Err(e) = lifecycle::shutdown(&daemon) {
        error!(error = %e, "shutdown failed");
        std::process::exit(1);
    }
    if forced {
        std::process::exit(1);
    }
}

/// Build the long-lived signal handling task.
///
/// Installed before startup so signals never fall through to the
/// default disposition. The task mirrors the split the global state
/// dictates: once the process is `Started`, SIGINT/SIGTERM/SIGQUIT
/// become shutdown requests the main loop acknowledges; before that,
/// they abort the startup path without executing the main loop.
fn install_signal_task() -> std::io::Result<impl std::future::Future<Output = ()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;
    let mut sighup = signal(SignalKind::hangup())?;

    Ok(async move {
        loop {
            let (grace, origin) = tokio::select! {
                _ = sigint.recv() => (ShutdownGrace::Gracefully, "SIGINT"),
                _ = sigterm.recv() => (ShutdownGrace::Gracefully, "SIGTERM"),
                _ = sigquit.recv() => (ShutdownGrace::RightNow, "SIGQUIT"),
                _ = sighup.recv() => {
                    // Log reopen: the appender holds the path, so a
                    // marker is enough for rotation tooling.
                    info!("SIGHUP received, log reopen checkpoint");
                    continue;
                }
            };
            if gstate::global().get() >= GlobalState::Started {
                request_shutdown(grace, origin);
            } else {
                error!(origin, "signal during startup, aborting");
                std::process::exit(1);
            }
        }
    })
}

/// Main loop: drive the callout table and acknowledge shutdown
/// requests the signal task posts to the global state.
async fn run_main_loop(daemon: &lifecycle::Daemon) -> Result<(), lifecycle::LifecycleError> {
    let tracker = gstate::global();

    let mut tick = tokio::time::interval(daemon.config.shutdown_check);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!(
        interval_secs = daemon.config.shutdown_check.as_secs(),
        "entering main loop"
    );

    loop {
        tick.tick().await;
        daemon.callouts.run_due(Instant::now());
        if tracker.get() >= GlobalState::RequestShutdown {
            let grace = tracker.shutdown_grace();
            info!(?grace, "shutdown requested, leaving main loop");
            // Unpark the requester.
            tracker.set(GlobalState::AcceptShutdown)?;
            break;
        }
    }
    Ok(())
}

/// Translate a signal into a global-state shutdown request from a
/// blocking thread (the request parks until the loop acknowledges).
fn request_shutdown(grace: ShutdownGrace, origin: &'static str) {
    info!(origin, ?grace, "shutdown signal");
    std::thread::spawn(move || {
        if let Err(e) = gstate::global().request_shutdown(grace) {
            error!(error = %e, "shutdown request failed");
        }
    });
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    rotate_log_if_needed(&config.log_path);

    let dir = config
        .log_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let name = config
        .log_path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_else(|| "sydd.log".into());
    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep.
const MAX_ROTATED_LOGS: u32 = 3;

/// Shift `sydd.log` through `.1`/`.2`/`.3` when it grows too large.
/// Best-effort: failures never stop startup.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
