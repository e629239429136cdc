//! Diagnostics sinks

pub mod diagnostics_sink;
pub mod json_lines;
#[cfg(test)]
pub mod recording_sink;
pub mod unix_socket;

pub use diagnostics_sink::DiagnosticsSink;
pub use json_lines::JsonLinesSink;
pub use unix_socket::UnixSocketSink;

#[cfg(test)]
pub use recording_sink::RecordingSink;
