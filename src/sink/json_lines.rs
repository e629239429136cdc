//! Newline-delimited JSON sink

use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};

use crate::{
    core::{error::SinkResult, types::DiagnosticsSnapshot},
    sink::DiagnosticsSink,
};

/// Writes every snapshot as one JSON line
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl JsonLinesSink<Stdout> {
    /// Sink writing to the process's standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> DiagnosticsSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        let mut line = serde_json::to_vec(snapshot)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;

        Ok(())
    }
}
