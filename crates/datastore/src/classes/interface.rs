// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Physical and virtual interfaces backing ports.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "interface";

/// MTU accepted range mirrors the dataplane's limits.
const MTU_MIN: u16 = 68;

#[derive(Debug, Clone)]
pub struct InterfaceAttrs {
    /// Backend kind, e.g. `ethernet-rawsock` or `ethernet-dpdk-phy`.
    pub interface_type: String,
    pub device: String,
    pub mtu: u16,
}

impl Default for InterfaceAttrs {
    fn default() -> Self {
        Self {
            interface_type: "ethernet-rawsock".to_string(),
            device: String::new(),
            mtu: 1500,
        }
    }
}

impl Attrs for InterfaceAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "type" => {
                self.interface_type = value.to_string();
                Ok(())
            }
            "device" => {
                self.device = value.to_string();
                Ok(())
            }
            "mtu" => {
                let mtu = parse::parse_u16(value)?;
                if mtu < MTU_MIN {
                    return Err(Error::OutOfRange);
                }
                self.mtu = mtu;
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "type", &self.interface_type);
        if !self.device.is_empty() {
            super::push_arg(out, "device", &self.device);
        }
        super::push_arg(out, "mtu", self.mtu);
    }
}

pub fn class_def() -> Arc<ClassDef<InterfaceAttrs>> {
    ClassDef::new(CLASS_NAME)
}
