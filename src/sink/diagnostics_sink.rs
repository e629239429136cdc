//! Diagnostics sink trait definition

use std::sync::Arc;

use trait_variant::make;

use crate::core::{error::SinkResult, types::DiagnosticsSnapshot};

/// Destination of published diagnostics snapshots
///
/// Publishing is fire-and-forget for the poller: an error is logged and
/// the next publish tick proceeds as usual.
#[make(Send)]
pub trait DiagnosticsSink: Sync + 'static {
    /// Emit one snapshot
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()>;
}

impl<T: DiagnosticsSink + Send> DiagnosticsSink for Arc<T> {
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        self.as_ref().publish(snapshot).await
    }
}

/// Disabled sinks are skipped
impl<T: DiagnosticsSink + Send> DiagnosticsSink for Option<T> {
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        match self {
            Some(sink) => sink.publish(snapshot).await,
            None => Ok(()),
        }
    }
}

/// Publishes to both sinks, the first error is reported
impl<A, B> DiagnosticsSink for (A, B)
where
    A: DiagnosticsSink + Send,
    B: DiagnosticsSink + Send,
{
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        let first = self.0.publish(snapshot).await;
        let second = self.1.publish(snapshot).await;
        first.and(second)
    }
}
