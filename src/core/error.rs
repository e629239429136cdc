//! Error types for the wireless link monitor

use std::time::Duration;

use thiserror::Error;

use super::types::Field;

/// Result type for remote shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Result type for link-state parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for link-state fetching
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for diagnostics sinks
pub type SinkResult<T> = Result<T, SinkError>;

/// Transport errors of the remote shell
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("failed to run ssh client: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("remote shell session failed (exit code {code:?}): {stderr}")]
    Session { code: Option<i32>, stderr: String },

    #[error("remote command rejected (exit code {code}): {stderr}")]
    CommandRejected { code: i32, stderr: String },

    #[error("remote command timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote shell session not connected")]
    NotConnected,
}

/// Reason a single field could not be extracted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("marker {0:?} not found")]
    MissingMarker(&'static str),

    #[error("marker {0:?} found before its expected position")]
    OutOfOrder(&'static str),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("malformed ratio {0:?}")]
    MalformedRatio(String),

    #[error("zero denominator")]
    ZeroDenominator,
}

/// Link-state output did not match the expected format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse {field}: {kind}")]
pub struct ParseError {
    pub field: Field,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(field: Field, kind: ParseErrorKind) -> Self {
        Self { field, kind }
    }
}

/// Errors of a single fetch attempt
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] ShellError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Errors of diagnostics sinks
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Invalid startup configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid interface name: {0:?}")]
    InvalidInterface(String),

    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("invalid socket mode {0:?}, expected octal permissions")]
    InvalidSocketMode(String),

    #[error("fetch timeout {timeout:?} exceeds refresh interval {interval:?}")]
    TimeoutExceedsInterval {
        timeout: Duration,
        interval: Duration,
    },
}
