// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policer actions: what a policer does to out-of-profile traffic.

use std::sync::Arc;

use syd_core::error::{Error, Result};

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "policer-action";

#[derive(Debug, Clone)]
pub struct PolicerActionAttrs {
    /// Action applied to exceeding traffic; only `discard` today.
    pub action_type: String,
}

impl Default for PolicerActionAttrs {
    fn default() -> Self {
        Self {
            action_type: "discard".to_string(),
        }
    }
}

impl Attrs for PolicerActionAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "type" => {
                if value != "discard" {
                    return Err(Error::InvalidArgs);
                }
                self.action_type = value.to_string();
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "type", &self.action_type);
    }
}

pub fn class_def() -> Arc<ClassDef<PolicerActionAttrs>> {
    ClassDef::new(CLASS_NAME)
}
