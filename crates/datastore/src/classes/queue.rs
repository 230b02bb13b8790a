// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output queues attachable to ports.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "queue";

#[derive(Debug, Clone)]
pub struct QueueAttrs {
    /// Scheduling discipline (`single-rate` or `two-rate`).
    pub queue_type: String,
    pub id: u64,
    pub priority: u16,
}

impl Default for QueueAttrs {
    fn default() -> Self {
        Self {
            queue_type: "single-rate".to_string(),
            id: 0,
            priority: 0,
        }
    }
}

impl Attrs for QueueAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "type" => {
                if value != "single-rate" && value != "two-rate" {
                    return Err(Error::InvalidArgs);
                }
                self.queue_type = value.to_string();
                Ok(())
            }
            "id" => {
                self.id = parse::parse_u64(value)?;
                Ok(())
            }
            "priority" => {
                self.priority = parse::parse_u16(value)?;
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "type", &self.queue_type);
        super::push_arg(out, "id", self.id);
        super::push_arg(out, "priority", self.priority);
    }
}

pub fn class_def() -> Arc<ClassDef<QueueAttrs>> {
    ClassDef::new(CLASS_NAME)
}
