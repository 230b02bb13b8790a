// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration sources and the stream-context record the evaluator
//! exposes to command handlers.
//!
//! A [`ConfigSource`] pairs a line-oriented input with an optional
//! output for result surfacing. Its [`ConfigType`] is how downstream
//! handlers decide, for example, whether to pretty-print.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use syd_core::error::Result;

/// Shape of the active configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigType {
    #[default]
    Unknown,
    File,
    StreamSession,
    StreamFd,
}

/// Context of the source currently feeding the evaluator.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub filename: Option<String>,
    pub lineno: u64,
    pub config_type: ConfigType,
    pub session_id: Option<u64>,
}

/// A line-oriented configuration source.
///
/// `gets` returns one physical line including its terminator, or `None`
/// at end of input; `printf` writes to the paired output stream.
pub trait ConfigSource: Send {
    fn gets(&mut self) -> Result<Option<String>>;

    fn printf(&mut self, text: &str) -> Result<()>;

    fn config_type(&self) -> ConfigType;

    fn session_id(&self) -> Option<u64> {
        None
    }

    /// Filename for file-shaped sources.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Configuration file source.
#[derive(Debug)]
pub struct FileSource {
    reader: BufReader<File>,
    path: String,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            path: path.display().to_string(),
        })
    }
}

impl ConfigSource for FileSource {
    fn gets(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        Ok((n > 0).then_some(line))
    }

    fn printf(&mut self, _text: &str) -> Result<()> {
        // Files have no output stream; results are discarded.
        Ok(())
    }

    fn config_type(&self) -> ConfigType {
        ConfigType::File
    }

    fn name(&self) -> Option<&str> {
        Some(&self.path)
    }
}

/// Session-backed source: an identified bidirectional stream, e.g. an
/// interactive or RPC session.
pub struct SessionSource {
    id: u64,
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl SessionSource {
    pub fn new(
        id: u64,
        input: Box<dyn BufRead + Send>,
        output: Box<dyn Write + Send>,
    ) -> Self {
        Self { id, input, output }
    }
}

impl std::fmt::Debug for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSource").field("id", &self.id).finish()
    }
}

impl ConfigSource for SessionSource {
    fn gets(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        Ok((n > 0).then_some(line))
    }

    fn printf(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    fn config_type(&self) -> ConfigType {
        ConfigType::StreamSession
    }

    fn session_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

/// Anonymous stream source (a raw descriptor, a pipe). No session
/// identity, so the backpressure gate never applies to it.
pub struct FdSource {
    input: Box<dyn BufRead + Send>,
    output: Option<Box<dyn Write + Send>>,
}

impl FdSource {
    pub fn new(input: Box<dyn BufRead + Send>, output: Option<Box<dyn Write + Send>>) -> Self {
        Self { input, output }
    }
}

impl std::fmt::Debug for FdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdSource").finish_non_exhaustive()
    }
}

impl ConfigSource for FdSource {
    fn gets(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        Ok((n > 0).then_some(line))
    }

    fn printf(&mut self, text: &str) -> Result<()> {
        if let Some(out) = self.output.as_mut() {
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }

    fn config_type(&self) -> ConfigType {
        ConfigType::StreamFd
    }
}
