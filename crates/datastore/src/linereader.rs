// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical-line assembly over a [`ConfigSource`].
//!
//! A logical line ends at an unescaped newline; a physical line whose
//! right-trimmed form ends in a backslash concatenates with the next
//! one. Blank physical lines never terminate an accumulation. At raw
//! EOF a partial accumulation becomes the last logical line.

use syd_core::error::Result;
use syd_core::text::trim_right;

use crate::context::ConfigSource;

const TRIM_SET: &str = " \t\r\n";

/// Reads logical lines, tracking line numbers and end-of-file.
#[derive(Debug, Default)]
pub struct LineReader {
    lineno: u64,
    eof: bool,
    buf: String,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the last physical line consumed.
    pub fn lineno(&self) -> u64 {
        self.lineno
    }

    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Assemble the next logical line. `None` means end of input with
    /// nothing accumulated.
    pub fn read_logical_line(&mut self, src: &mut dyn ConfigSource) -> Result<Option<String>> {
        self.buf.clear();

        while let Some(physical) = src.gets()? {
            self.lineno += 1;

            let terminated = physical.ends_with('\n') || physical.ends_with('\r');
            if !terminated {
                // Unterminated chunk: keep accumulating until a newline
                // or EOF arrives.
                self.buf.push_str(&physical);
                continue;
            }

            let trimmed = trim_right(&physical, TRIM_SET);
            if trimmed.is_empty() {
                continue;
            }

            if let Some(stripped) = trimmed.strip_suffix('\\') {
                if !stripped.is_empty() {
                    self.buf.push_str(stripped);
                }
                continue;
            }

            self.buf.push_str(trimmed);
            return Ok(Some(std::mem::take(&mut self.buf)));
        }

        self.eof = true;
        let last = trim_right(&self.buf, TRIM_SET);
        if last.is_empty() {
            self.buf.clear();
            Ok(None)
        } else {
            let line = last.to_string();
            self.buf.clear();
            Ok(Some(line))
        }
    }
}

#[cfg(test)]
#[path = "linereader_tests.rs"]
mod tests;
