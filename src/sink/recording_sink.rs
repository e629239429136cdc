//! Recording diagnostics sink for testing

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    core::{
        error::{SinkError, SinkResult},
        types::DiagnosticsSnapshot,
    },
    sink::DiagnosticsSink,
};

#[derive(Debug, Default)]
struct RecordingState {
    published: Vec<DiagnosticsSnapshot>,
    should_fail: bool,
}

/// Sink keeping every published snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure sink to fail every publish
    pub async fn set_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail = should_fail;
    }

    /// Snapshots published so far
    pub async fn published(&self) -> Vec<DiagnosticsSnapshot> {
        self.inner.lock().await.published.clone()
    }

    /// Most recent snapshot
    pub async fn last(&self) -> Option<DiagnosticsSnapshot> {
        self.inner.lock().await.published.last().cloned()
    }
}

impl DiagnosticsSink for RecordingSink {
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        let mut state = self.inner.lock().await;
        if state.should_fail {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "Mock sink failure",
            )));
        }
        state.published.push(snapshot.clone());
        Ok(())
    }
}
