// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The atomic transaction manager.
//!
//! `atomic-begin` snapshots serialized live state into a 0600 temp file
//! and flips the interpreter to `Atomic`. `commit` walks every object
//! twice (promote, then finalize); any failure rolls the block back,
//! and a rollback that cannot clean up falls back to destroying all
//! objects and re-parsing the snapshot. Whatever path a block takes,
//! the snapshot file is unlinked exactly once.

use std::io::Write;
use std::path::Path;

use syd_core::error::{Error, Result};

use crate::context::FileSource;
use crate::interp::{InterpCore, InterpState};
use crate::results::ResultBuf;

impl InterpCore {
    pub(crate) fn unlink_atomic_save_file(&mut self) {
        if let Some(path) = self.atomic_save_file.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::debug!(file = %path.display(), error = %e, "snapshot unlink failed");
            }
        }
    }

    /// Serialize live state into a fresh temp file derived from
    /// `template` and remember its path.
    fn atomic_auto_save(&mut self, template: &Path, _result: &mut ResultBuf) -> Result<()> {
        // Drop any stale snapshot from a previous block.
        self.unlink_atomic_save_file();

        let dir = match template.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::env::temp_dir(),
        };
        let prefix = template
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "atomic".to_string());

        let tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .tempfile_in(&dir)?;
        let (mut file, path) = tmp.keep().map_err(|_| Error::PosixApi)?;
        tracing::debug!(file = %path.display(), "auto save file");
        self.atomic_save_file = Some(path);

        let mut out = String::new();
        self.serialize_all(&mut out)?;
        file.write_all(out.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Re-parse the snapshot file after destroying every object: the
    /// last resort when rollback itself fails.
    fn atomic_auto_load(&mut self, result: &mut ResultBuf) -> Result<()> {
        // State is restored before the destroy walk runs, so objects
        // are torn down under the pre-block state.
        self.restore_state();

        if let Err(e) = self.destroy_obj_locked(None, result) {
            tracing::error!(error = %e, "failed to destroy objects for auto load");
            return Err(e);
        }

        tracing::info!("auto rollbacking from load file");
        result.clear();
        let Some(path) = self.atomic_save_file.clone() else {
            return Err(Error::NotFound);
        };
        tracing::debug!(file = %path.display(), "auto load file");

        let ret = match self.current_configurator.clone() {
            Some(name) => self.eval_file_locked(&name, &path, false, result),
            None => {
                let mut src = FileSource::open(&path)?;
                self.eval_stream(&mut src, result)
            }
        };
        if let Err(e) = ret {
            tracing::error!(error = %e, "auto load failed");
            return Err(e);
        }
        Ok(())
    }

    /// Open an atomic block. Only legal in `AutoCommit`; a failed
    /// snapshot leaves the state untouched.
    pub(crate) fn atomic_begin_locked(
        &mut self,
        file_template: &Path,
        result: &mut ResultBuf,
    ) -> Result<()> {
        if self.state() != InterpState::AutoCommit {
            return Err(Error::InvalidStateTransition);
        }
        self.save_state();
        match self.atomic_auto_save(file_template, result) {
            Ok(()) => {
                self.set_state(InterpState::Atomic);
                Ok(())
            }
            Err(e) => {
                self.unlink_atomic_save_file();
                Err(e)
            }
        }
    }

    /// Two-pass commit. On failure the block is rolled back and the
    /// first error string is preserved in `result`.
    pub(crate) fn atomic_commit_locked(&mut self, result: &mut ResultBuf) -> Result<()> {
        if self.state() != InterpState::Atomic {
            return Err(Error::InvalidStateTransition);
        }
        result.clear();
        tracing::info!("commit start");

        self.set_state(InterpState::Committing);
        let ret = match self.update_all_objs(result) {
            Ok(()) => {
                self.set_state(InterpState::Committed);
                match self.update_all_objs(result) {
                    Ok(()) => {
                        tracing::info!("commit success");
                        self.restore_state();
                        Ok(())
                    }
                    Err(e) => self.commit_failure(e, result),
                }
            }
            Err(e) => self.commit_failure(e, result),
        };
        self.unlink_atomic_save_file();
        ret
    }

    /// Shared failure path for both commit passes: remember the first
    /// error string, roll back, and surface the original error when the
    /// rollback succeeds.
    fn commit_failure(&mut self, err: Error, result: &mut ResultBuf) -> Result<()> {
        self.set_state(InterpState::CommitFailure);
        tracing::error!(error = %err, "failed to commit");

        let commit_msg = result.take();
        match self.atomic_rollback_locked(false, result) {
            Ok(()) => {
                result.set(commit_msg);
                Err(err)
            }
            Err(rb) => Err(rb),
        }
    }

    /// Discard the block: objects drop staged changes over two passes.
    pub(crate) fn atomic_abort_locked(&mut self, result: &mut ResultBuf) -> Result<()> {
        if self.state() != InterpState::Atomic {
            return Err(Error::InvalidStateTransition);
        }
        result.clear();
        tracing::info!("abort start");

        self.set_state(InterpState::Aborting);
        let ret = match self.update_all_objs(result) {
            Ok(()) => {
                self.set_state(InterpState::Aborted);
                match self.update_all_objs(result) {
                    Ok(()) => {
                        tracing::info!("abort success");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to clean up after abort");
                        Err(e)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to abort");
                Err(e)
            }
        };
        self.unlink_atomic_save_file();
        self.restore_state();
        ret
    }

    /// Revert to the state captured at `atomic-begin`. Legal from
    /// `CommitFailure`, or from `Atomic` when forced. A rollback that
    /// cannot clean up falls back to reloading the snapshot file.
    pub(crate) fn atomic_rollback_locked(
        &mut self,
        force: bool,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let allowed = self.state() == InterpState::CommitFailure
            || (self.state() == InterpState::Atomic && force);
        if !allowed {
            return Err(Error::InvalidStateTransition);
        }
        result.clear();
        tracing::info!("rollback start");

        self.set_state(InterpState::Rollbacking);
        let ret = match self.update_all_objs(result) {
            Ok(()) => {
                self.set_state(InterpState::Rollbacked);
                match self.update_all_objs(result) {
                    Ok(()) => {
                        tracing::info!("rollback success");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to clean up after rollback");
                        self.atomic_auto_load(result)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to rollback");
                self.atomic_auto_load(result)
            }
        };
        self.unlink_atomic_save_file();
        self.restore_state();
        ret
    }

    pub(crate) fn dryrun_begin_locked(&mut self) -> Result<()> {
        if self.state() != InterpState::AutoCommit {
            return Err(Error::InvalidStateTransition);
        }
        self.save_state();
        self.set_state(InterpState::Dryrun);
        Ok(())
    }

    pub(crate) fn dryrun_end_locked(&mut self) -> Result<()> {
        if self.state() != InterpState::Dryrun {
            return Err(Error::InvalidStateTransition);
        }
        self.restore_state();
        Ok(())
    }
}
