// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed result-code enumeration returned by every fallible
//! operation in the workspace.
//!
//! The success case is the ordinary `Ok(())` of [`Result`]; the error
//! case is one of the kinds below. Kinds carry no payload so they can be
//! compared, copied, and stored next to a separately-built result
//! string (see the datastore result buffer).

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by all crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    #[error("posix api error")]
    PosixApi,
    #[error("no more memory")]
    NoMemory,
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("not operational")]
    NotOperational,
    #[error("invalid arguments")]
    InvalidArgs,
    #[error("not the owner")]
    NotOwner,
    #[error("not started")]
    NotStarted,
    #[error("timed out")]
    Timedout,
    #[error("iteration halted")]
    IterationHalted,
    #[error("value out of range")]
    OutOfRange,
    #[error("not a number")]
    NotANumber,
    #[error("already halted")]
    AlreadyHalted,
    #[error("invalid object")]
    InvalidObject,
    #[error("invalid state transition")]
    InvalidStateTransition,
    #[error("busy")]
    Busy,
    #[error("stopped")]
    Stopped,
    #[error("unsupported")]
    Unsupported,
    #[error("quotation is not closed")]
    QuoteNotClosed,
    #[error("not allowed")]
    NotAllowed,
    #[error("too many objects")]
    TooManyObjects,
    #[error("end of file")]
    Eof,
    #[error("interrupted")]
    Interrupted,
}

impl Error {
    /// Stable wire name used in JSON result fragments.
    pub fn code_str(&self) -> &'static str {
        match self {
            Error::PosixApi => "POSIX_API_ERROR",
            Error::NoMemory => "NO_MEMORY",
            Error::NotFound => "NOT_FOUND",
            Error::AlreadyExists => "ALREADY_EXISTS",
            Error::NotOperational => "NOT_OPERATIONAL",
            Error::InvalidArgs => "INVALID_ARGS",
            Error::NotOwner => "NOT_OWNER",
            Error::NotStarted => "NOT_STARTED",
            Error::Timedout => "TIMEDOUT",
            Error::IterationHalted => "ITERATION_HALTED",
            Error::OutOfRange => "OUT_OF_RANGE",
            Error::NotANumber => "NOT_A_NUMBER",
            Error::AlreadyHalted => "ALREADY_HALTED",
            Error::InvalidObject => "INVALID_OBJECT",
            Error::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            Error::Busy => "BUSY",
            Error::Stopped => "STOPPED",
            Error::Unsupported => "UNSUPPORTED",
            Error::QuoteNotClosed => "QUOTE_NOT_CLOSED",
            Error::NotAllowed => "NOT_ALLOWED",
            Error::TooManyObjects => "TOO_MANY_OBJECTS",
            Error::Eof => "EOF",
            Error::Interrupted => "INTERRUPTED",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(_: std::io::Error) -> Self {
        Error::PosixApi
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
