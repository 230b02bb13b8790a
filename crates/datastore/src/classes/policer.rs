// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policers: rate limiting applied to ports.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "policer";

#[derive(Debug, Clone, Default)]
pub struct PolicerAttrs {
    /// Names of policer-action objects, in attachment order.
    pub actions: Vec<String>,
    /// Bits per second.
    pub bandwidth_limit: u64,
    /// Bytes.
    pub burst_size_limit: u64,
    pub bandwidth_percent: u16,
}

impl Attrs for PolicerAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "action" => {
                if !self.actions.iter().any(|a| a == value) {
                    self.actions.push(value.to_string());
                }
                Ok(())
            }
            "bandwidth-limit" => {
                self.bandwidth_limit = parse::parse_u64(value)?;
                Ok(())
            }
            "burst-size-limit" => {
                self.burst_size_limit = parse::parse_u64(value)?;
                Ok(())
            }
            "bandwidth-percent" => {
                let pct = parse::parse_u16(value)?;
                if pct > 100 {
                    return Err(Error::OutOfRange);
                }
                self.bandwidth_percent = pct;
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        for action in &self.actions {
            super::push_arg(out, "action", action);
        }
        super::push_arg(out, "bandwidth-limit", self.bandwidth_limit);
        super::push_arg(out, "burst-size-limit", self.burst_size_limit);
        super::push_arg(out, "bandwidth-percent", self.bandwidth_percent);
    }
}

pub fn class_def() -> Arc<ClassDef<PolicerAttrs>> {
    ClassDef::new(CLASS_NAME)
}
