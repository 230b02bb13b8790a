// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control channels: the transport endpoint a controller speaks over.

use std::sync::Arc;

use syd_core::error::{Error, Result};
use syd_core::parse;

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "channel";

#[derive(Debug, Clone)]
pub struct ChannelAttrs {
    pub dst_addr: String,
    pub dst_port: u16,
    /// `tcp` or `tls`.
    pub protocol: String,
}

impl Default for ChannelAttrs {
    fn default() -> Self {
        Self {
            dst_addr: "127.0.0.1".to_string(),
            dst_port: 6633,
            protocol: "tcp".to_string(),
        }
    }
}

impl Attrs for ChannelAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "dst-addr" => {
                self.dst_addr = value.to_string();
                Ok(())
            }
            "dst-port" => {
                let port = parse::parse_u16(value)?;
                if port == 0 {
                    return Err(Error::OutOfRange);
                }
                self.dst_port = port;
                Ok(())
            }
            "protocol" => {
                if value != "tcp" && value != "tls" {
                    return Err(Error::InvalidArgs);
                }
                self.protocol = value.to_string();
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        super::push_arg(out, "dst-addr", &self.dst_addr);
        super::push_arg(out, "dst-port", self.dst_port);
        super::push_arg(out, "protocol", &self.protocol);
    }
}

pub fn class_def() -> Arc<ClassDef<ChannelAttrs>> {
    ClassDef::new(CLASS_NAME)
}
