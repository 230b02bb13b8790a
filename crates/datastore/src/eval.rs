// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Statement evaluation: tokenization, dispatch, and the per-source
//! evaluation loops.

use std::path::Path;

use syd_core::error::{Error, Result};
use syd_core::text;

use crate::context::{ConfigSource, FileSource};
use crate::interp::{EvalContext, InterpCore, InterpState};
use crate::linereader::LineReader;
use crate::results::ResultBuf;

/// Token and statement cap per evaluation.
pub const TOKEN_MAX: usize = 8192;

const DELIMS: &str = " \t\r\n";
const QUOTES: &str = "\"'";

impl InterpCore {
    /// Evaluate a string: split into statements, tokenize each, and
    /// dispatch exactly one handler per statement.
    ///
    /// `src` is the stream to surface results on (interactive mode
    /// only); `None` evaluates silently.
    pub(crate) fn eval_str(
        &mut self,
        input: &str,
        src: Option<&mut dyn ConfigSource>,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut ret: Result<()> = Ok(());
        let mut errcmd: Option<String> = None;

        match text::tokenize(input, TOKEN_MAX, "\r\n") {
            Ok(statements) => {
                for stmt in statements {
                    // A session still draining large output drops the
                    // statement instead of queueing behind it.
                    if self.is_blocking_session() {
                        tracing::warn!(statement = stmt, "session busy sending, statement skipped");
                        ret = Ok(());
                        continue;
                    }

                    let first = stmt.trim_start();
                    if first.is_empty() || first.starts_with('#') {
                        continue;
                    }

                    let tokens = match text::tokenize_quote(stmt, TOKEN_MAX, DELIMS, QUOTES) {
                        Ok(tokens) => tokens,
                        Err(e) => {
                            ret = Err(e);
                            break;
                        }
                    };
                    if tokens.is_empty() {
                        continue;
                    }

                    let verb = tokens[0].as_str();
                    match self.find_command(verb) {
                        Ok(handler) => {
                            let class = self.classes().find(verb).ok();
                            let state = self.state();
                            ret = handler(self, state, &tokens, class.as_deref(), result);
                            if ret.is_err() {
                                break;
                            }
                        }
                        Err(_) if self.state() == InterpState::Preload => {
                            // Pre-loading: not all command modules are
                            // registered yet.
                            ret = Ok(());
                        }
                        Err(_) => {
                            errcmd = Some(verb.to_string());
                            ret = Err(Error::NotFound);
                            break;
                        }
                    }
                }
            }
            Err(e) => ret = Err(e),
        }

        match ret {
            Err(Error::NotFound) => {
                // A dispatch miss always reports; a handler's own
                // message is kept.
                if let Some(cmd) = errcmd {
                    result.set_error(Error::NotFound, &format!("'{cmd}' command not found."));
                } else if result.is_empty() {
                    result.set_error(Error::NotFound, "command not found.");
                }
            }
            Err(Error::TooManyObjects) => {
                if result.is_empty() {
                    result.set_error(Error::TooManyObjects, "Too many lines or tokens.");
                }
            }
            _ => {
                // Keep whatever the handler left in the buffer.
            }
        }

        if let Some(src) = src {
            if self.is_interactive() && !result.is_empty() {
                let line = format!("{result}\n");
                src.printf(&line)?;
            }
        }

        ret
    }

    /// Evaluate a stream source. Interactive mode handles exactly one
    /// logical line per call; file mode runs to EOF and augments the
    /// first failure with its line number.
    pub(crate) fn eval_stream(
        &mut self,
        src: &mut dyn ConfigSource,
        result: &mut ResultBuf,
    ) -> Result<()> {
        self.contexts.push(EvalContext {
            filename: src.name().map(String::from),
            config_type: src.config_type(),
            session_id: src.session_id(),
            lineno: 0,
        });
        let out = self.eval_stream_inner(src, result);
        self.contexts.pop();
        out
    }

    fn set_lineno(&mut self, lineno: u64) {
        if let Some(ctx) = self.contexts.last_mut() {
            ctx.lineno = lineno;
        }
    }

    fn eval_stream_inner(
        &mut self,
        src: &mut dyn ConfigSource,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut reader = LineReader::new();

        if self.is_interactive() {
            return match reader.read_logical_line(src)? {
                Some(line) => {
                    self.set_lineno(reader.lineno());
                    self.eval_str(&line, Some(&mut *src), result)
                }
                None => Err(Error::Eof),
            };
        }

        let mut ret: Result<()> = Ok(());
        while !reader.eof() {
            match reader.read_logical_line(&mut *src) {
                Ok(Some(line)) => {
                    self.set_lineno(reader.lineno());
                    ret = self.eval_str(&line, Some(&mut *src), result);
                    if ret.is_err() {
                        let fragment = format!(", \"line\": {}", reader.lineno());
                        if result.insert_before_last(&fragment).is_err() {
                            tracing::warn!("result line annotation failed");
                        }
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    ret = Err(e);
                    break;
                }
            }
        }
        ret
    }

    /// Parse a configuration file on behalf of `configurator`. With
    /// `preload`, unknown verbs are silently skipped so the file can be
    /// parsed before all command modules are registered.
    pub(crate) fn eval_file_locked(
        &mut self,
        configurator: &str,
        path: &Path,
        preload: bool,
        result: &mut ResultBuf,
    ) -> Result<()> {
        let mut src = FileSource::open(path)?;

        let prev_state = self.state();
        if preload {
            self.set_state(InterpState::Preload);
        }
        let ret = self.with_configurator(configurator, false, |core| {
            core.eval_stream(&mut src, result)
        });
        if preload {
            self.set_state(prev_state);
        }

        if ret.is_err() {
            let (escaped, _) = text::escape(&path.display().to_string(), "\"'/");
            let fragment = format!(", \"file\": \"{escaped}\"");
            if result.insert_before_last(&fragment).is_err() {
                tracing::warn!("result file annotation failed");
            }
        }
        ret
    }
}
