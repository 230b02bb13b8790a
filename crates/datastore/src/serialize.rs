// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-state serialization.
//!
//! The output is ordinary configuration text: fed back through the
//! evaluator it recreates an equivalent live state. Global knobs come
//! first, then each class's instances in dependency order, then a
//! second pass of `<class> <name> enable|disable` status lines.

use std::path::Path;

use syd_core::error::Result;

use crate::interp::InterpCore;
use crate::results::ResultBuf;

impl InterpCore {
    /// Serialize everything into `out`.
    pub(crate) fn serialize_all(&mut self, out: &mut String) -> Result<()> {
        // Non-class global knobs (log, datastore, agent, ...) first.
        let serializers = self.global_serializers.clone();
        for (name, serialize) in &serializers {
            out.push_str(&format!("# {name} settings\n"));
            serialize(out)?;
            out.push('\n');
        }

        let all = self.classes().all_in_order();
        let state = self.state();

        for (entry, objs) in &all {
            out.push_str(&format!("# all the {} objects\n", entry.name));
            for obj in objs {
                entry.hooks.serialize(state, obj, out)?;
            }
            out.push('\n');
        }

        for (entry, objs) in &all {
            out.push_str(&format!("# {} objects' status\n", entry.name));
            for obj in objs {
                let name = entry.hooks.name_of(obj)?;
                let enabled = entry.hooks.enable(state, obj, false, None)?;
                out.push_str(&format!(
                    "{} {} {}\n",
                    entry.name,
                    name,
                    if enabled { "enable" } else { "disable" }
                ));
            }
            out.push('\n');
        }

        Ok(())
    }

    /// Serialize into a file.
    pub(crate) fn save_file_locked(&mut self, path: &Path, result: &mut ResultBuf) -> Result<()> {
        let mut out = String::new();
        self.serialize_all(&mut out)?;
        if let Err(e) = std::fs::write(path, out) {
            result.set_error(
                syd_core::Error::PosixApi,
                &format!("can't write '{}'.", path.display()),
            );
            return Err(e.into());
        }
        Ok(())
    }
}
