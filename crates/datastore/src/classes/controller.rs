// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenFlow controllers bound to channels.

use std::sync::Arc;

use syd_core::error::{Error, Result};

use crate::class::ClassDef;
use crate::object::Attrs;

pub const CLASS_NAME: &str = "controller";

#[derive(Debug, Clone)]
pub struct ControllerAttrs {
    /// Name of the channel object carrying this controller.
    pub channel: String,
    /// `equal`, `master`, or `slave`.
    pub role: String,
    /// `main` or `auxiliary`.
    pub connection_type: String,
}

impl Default for ControllerAttrs {
    fn default() -> Self {
        Self {
            channel: String::new(),
            role: "equal".to_string(),
            connection_type: "main".to_string(),
        }
    }
}

impl Attrs for ControllerAttrs {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "channel" => {
                self.channel = value.to_string();
                Ok(())
            }
            "role" => {
                if !matches!(value, "equal" | "master" | "slave") {
                    return Err(Error::InvalidArgs);
                }
                self.role = value.to_string();
                Ok(())
            }
            "connection-type" => {
                if !matches!(value, "main" | "auxiliary") {
                    return Err(Error::InvalidArgs);
                }
                self.connection_type = value.to_string();
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    fn serialize_args(&self, out: &mut String) {
        if !self.channel.is_empty() {
            super::push_arg(out, "channel", &self.channel);
        }
        super::push_arg(out, "role", &self.role);
        super::push_arg(out, "connection-type", &self.connection_type);
    }
}

pub fn class_def() -> Arc<ClassDef<ControllerAttrs>> {
    ClassDef::new(CLASS_NAME)
}
