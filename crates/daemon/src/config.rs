// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon host configuration.
//!
//! Paths and intervals come from three layers: built-in defaults, an
//! optional `daemon.toml`, and command-line flags (strongest).

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::lifecycle::LifecycleError;

/// Default shutdown-check interval in seconds.
const DEFAULT_SHUTDOWN_CHECK_SECS: u64 = 1;

/// Command-line options for `sydd`.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// `-to <seconds>`: shutdown check interval.
    pub shutdown_check_secs: Option<u64>,
    /// `-c <file>`: switch configuration file.
    pub config_file: Option<PathBuf>,
}

/// `daemon.toml` contents.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileCfg {
    #[serde(default)]
    daemon: DaemonSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DaemonSection {
    run_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    shutdown_check_secs: Option<u64>,
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime state directory (pidfile, logs).
    pub run_dir: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
    /// Switch configuration file parsed at startup, when present.
    pub config_file: Option<PathBuf>,
    pub shutdown_check: Duration,
}

impl Config {
    /// Resolve configuration from defaults, `daemon.toml`, and CLI
    /// flags.
    pub fn load(cli: &CliArgs) -> Result<Self, LifecycleError> {
        let file_cfg = read_file_cfg()?;

        let run_dir = file_cfg
            .daemon
            .run_dir
            .clone()
            .unwrap_or_else(default_run_dir);

        let shutdown_check_secs = cli
            .shutdown_check_secs
            .or(file_cfg.daemon.shutdown_check_secs)
            .unwrap_or(DEFAULT_SHUTDOWN_CHECK_SECS)
            .max(1);

        let config_file = cli
            .config_file
            .clone()
            .or_else(|| file_cfg.daemon.config_file.clone());

        Ok(Self {
            pid_path: run_dir.join("sydd.pid"),
            log_path: run_dir.join("sydd.log"),
            run_dir,
            config_file,
            shutdown_check: Duration::from_secs(shutdown_check_secs),
        })
    }
}

fn default_run_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("switchyard")
}

fn config_toml_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("switchyard").join("daemon.toml"))
}

fn read_file_cfg() -> Result<FileCfg, LifecycleError> {
    let Some(path) = config_toml_path() else {
        return Ok(FileCfg::default());
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Ok(FileCfg::default()),
    };
    toml::from_str(&content).map_err(|e| LifecycleError::BadConfig(e.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
