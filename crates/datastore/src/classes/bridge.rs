// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges: the OpenFlow datapaths tying ports and controllers
//! together. Last in the dependency order, so a bridge is created
//! after, and destroyed before, everything it references.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "bridge";

#[derive(Debug, Clone)]
pub struct BridgeAttrs {
    /// Datapath id; 64-bit, unique per bridge.
    pub dpid: u64,
    /// `secure` or `standalone`.
    pub fail_mode: String,
    pub ports: Vec<String>,
    pub controllers: Vec<String>,
}

impl Default for BridgeAttrs {
    fn default() -> Self {
        Self {
            dpid: 0,
            fail_mode: "secure".to_string(),
            ports: Vec::new(),
            controllers: Vec::new(),
        }
    }
}

impl Attrs for BridgeAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "dpid" => {
                self.dpid = parse::parse_u64(value)?;
                Ok(())
            }
            "fail-mode" => {
                if value != "secure" && value != "standalone" {
                    return Err(Error::InvalidArgs);
                }
                self.fail_mode = value.to_string();
                Ok(())
            }
            "port" => {
                if !self.ports.iter().any(|p| p == value) {
                    self.ports.push(value.to_string());
                }
                Ok(())
            }
            "controller" => {
                if !self.controllers.iter().any(|c| c == value) {
                    self.controllers.push(value.to_string());
                }
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "dpid", self.dpid);
        super::push_arg(out, "fail-mode", &self.fail_mode);
        for port in &self.ports {
            super::push_arg(out, "port", port);
        }
        for controller in &self.controllers {
            super::push_arg(out, "controller", controller);
        }
    }
}

pub fn class_def() -> Arc<ClassDef<BridgeAttrs>> {
    ClassDef::new(CLASS_NAME)
}
