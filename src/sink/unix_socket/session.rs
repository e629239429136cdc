//! Unix socket subscriber session management

use serde::Serialize;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::unix::{OwnedReadHalf, OwnedWriteHalf},
    sync::Mutex,
};

use crate::core::types::SessionId;

/// Write side of a connected subscriber
#[derive(Debug)]
pub struct SubscriberSession {
    id: SessionId,
    writer: Mutex<OwnedWriteHalf>,
}

impl SubscriberSession {
    /// Create a new subscriber session
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            id: SessionId::new(),
            writer: Mutex::new(writer),
        }
    }

    /// Get session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Send one JSON-RPC message as a single line
    pub async fn send<T: Serialize>(&self, message: &T) -> std::io::Result<()> {
        let mut json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        json.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&json).await?;
        writer.flush().await?;

        Ok(())
    }
}

/// Line reader for incoming subscriber requests
pub struct SessionReader {
    lines: Lines<BufReader<OwnedReadHalf>>,
}

impl SessionReader {
    /// Create a new session reader
    pub fn new(reader: OwnedReadHalf) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Read the next line, `None` once the subscriber hung up
    ///
    /// Cancel safe, so it can race against outgoing notifications.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}
