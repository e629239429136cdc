//! Wireless link monitor
//!
//! Samples the wireless link of a remote host by running `iwconfig` over
//! a persistent SSH session and publishes the parsed status as periodic
//! diagnostics snapshots to:
//! - stdout (JSON lines)
//! - Unix Domain Socket subscribers (JSON-RPC 2.0)

pub mod config;
pub mod core;
pub mod protocol;
pub mod shell;
pub mod sink;

pub use core::{
    error::{ConfigError, FetchError, ParseError, ShellError, SinkError},
    types::{DiagnosticsSnapshot, LinkStatus, SampleState, StatusLevel},
};
