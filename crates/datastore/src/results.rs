// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The result buffer command handlers write into.
//!
//! Results travel as JSON fragments shaped `{"ret":"<CODE>", ...}`.
//! The evaluator augments failures with position information by
//! splicing extra members in front of the closing brace, so helpers
//! here keep the fragment well-formed.

use syd_core::error::{Error, Result};

/// Growable result string with JSON helpers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultBuf {
    buf: String,
}

impl ResultBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Take the accumulated string, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn append(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn set(&mut self, s: impl Into<String>) {
        self.buf = s.into();
    }

    /// Replace the buffer with `{"ret":"OK"}`.
    pub fn set_ok(&mut self) {
        self.buf = r#"{"ret":"OK"}"#.to_string();
    }

    /// Replace the buffer with `{"ret":"<CODE>", "data":"<msg>"}`.
    pub fn set_error(&mut self, code: Error, msg: &str) {
        self.buf = format!(
            r#"{{"ret":"{}", "data":{}}}"#,
            code.code_str(),
            serde_json::Value::String(msg.to_string())
        );
    }

    /// Splice `fragment` in just before the last byte, keeping a JSON
    /// object fragment well-formed (`…, "line": 3}`). Fails with
    /// `InvalidArgs` when the buffer is empty.
    pub fn insert_before_last(&mut self, fragment: &str) -> Result<()> {
        if self.buf.is_empty() {
            return Err(Error::InvalidArgs);
        }
        let at = self.buf.len() - 1;
        if !self.buf.is_char_boundary(at) {
            return Err(Error::InvalidArgs);
        }
        self.buf.insert_str(at, fragment);
        Ok(())
    }
}

impl std::fmt::Display for ResultBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buf)
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
