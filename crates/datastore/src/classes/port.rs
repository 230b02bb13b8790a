// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Switch ports: an OpenFlow port number bound to an interface, with
//! optional policer and queues.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "port";

#[derive(Debug, Clone, Default)]
pub struct PortAttrs {
    /// OpenFlow port number; 0 means unassigned.
    pub number: u32,
    pub interface: String,
    pub policer: String,
    pub queues: Vec<String>,
}

impl Attrs for PortAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "number" => {
                self.number = parse::parse_u32(value)?;
                Ok(())
            }
            "interface" => {
                self.interface = value.to_string();
                Ok(())
            }
            "policer" => {
                self.policer = value.to_string();
                Ok(())
            }
            "queue" => {
                if !self.queues.iter().any(|q| q == value) {
                    self.queues.push(value.to_string());
                }
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "number", self.number);
        if !self.interface.is_empty() {
            super::push_arg(out, "interface", &self.interface);
        }
        if !self.policer.is_empty() {
            super::push_arg(out, "policer", &self.policer);
        }
        for queue in &self.queues {
            super::push_arg(out, "queue", queue);
        }
    }
}

pub fn class_def() -> Arc<ClassDef<PortAttrs>> {
    ClassDef::new(CLASS_NAME)
}
