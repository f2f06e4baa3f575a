/*!
# Unified Error Type

This module provides a unified error enum for every fallible operation in the
crate: graph/attribute loading, hierarchy I/O, and argument validation in the
CLI binaries.
*/

use std::error::Error as StdError;
use std::fmt;

/// Unified error type for all operations in this crate.
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure (file open/read/write).
    Io(String),

    /// A line of an edge-list, attribute, or hierarchy file could not be parsed.
    InvalidFormat(String),

    /// An attribute row's dimension disagreed with the table's inferred dimension.
    DimensionMismatch(String),

    /// The graph violates an invariant required by the requested operation
    /// (e.g. partitioning an empty graph).
    InvalidGraph(String),

    /// A CLI argument or library parameter was out of range or malformed.
    InvalidArgument(String),

    /// An allocation could not be satisfied (surfaced rather than aborting).
    OutOfMemory(String),

    /// A CLI invocation was malformed (wrong argument count, unparseable
    /// positional argument). Distinct from `InvalidArgument`, which covers
    /// library-level parameter validation once arguments are already parsed.
    Usage(String),
}

impl Error {
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io(message.into())
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Error::InvalidFormat(message.into())
    }

    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Error::DimensionMismatch(message.into())
    }

    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Error::InvalidGraph(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
            Error::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            Error::InvalidGraph(msg) => write!(f, "invalid graph: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::OutOfMemory(msg) => write!(f, "out of memory: {}", msg),
            Error::Usage(msg) => write!(f, "usage: {}", msg),
        }
    }
}

impl StdError for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(e: std::num::ParseIntError) -> Self {
        Error::InvalidFormat(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(e: std::num::ParseFloatError) -> Self {
        Error::InvalidFormat(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
