//! Unix socket diagnostics server

use listenfd::ListenFd;
use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs,
    net::{UnixListener, UnixStream},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, error, info, warn};

use crate::{
    core::{error::SinkResult, types::DiagnosticsSnapshot},
    protocol::{JsonRpcNotification, Notification},
    sink::{
        DiagnosticsSink,
        unix_socket::{
            handler::RequestHandler,
            session::{SessionReader, SubscriberSession},
        },
    },
};

/// Snapshots buffered per subscriber before it starts lagging
const NOTIFICATION_CAPACITY: usize = 16;

/// Streams every published snapshot to connected socket subscribers
///
/// Subscribers receive a `diagnostics` JSON-RPC notification per publish
/// tick and may ask for the latest snapshot with `get_snapshot`.
pub struct UnixSocketSink {
    socket_path: PathBuf,
    listener: UnixListener,
    handler: Arc<RequestHandler>,
    notification_tx: broadcast::Sender<JsonRpcNotification>,
    owns_socket_file: bool,
}

impl UnixSocketSink {
    /// Bind the socket, preferring a listener passed by systemd
    pub async fn bind(socket_path: impl Into<PathBuf>, mode: u32) -> std::io::Result<Self> {
        let socket_path = socket_path.into();

        let (listener, owns_socket_file) = match ListenFd::from_env().take_unix_listener(0)? {
            Some(std_listener) => {
                info!("Using socket-activated listener");
                std_listener.set_nonblocking(true)?;
                (UnixListener::from_std(std_listener)?, false)
            }
            None => {
                // Remove stale socket file from a previous run
                if Path::new(&socket_path).exists() {
                    fs::remove_file(&socket_path).await?;
                }

                let listener = UnixListener::bind(&socket_path)?;
                fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(mode)).await?;
                (listener, true)
            }
        };

        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Ok(Self {
            socket_path,
            listener,
            handler: Arc::new(RequestHandler::new()),
            notification_tx,
            owns_socket_file,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Number of connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.notification_tx.receiver_count()
    }

    /// Accept subscribers until the task is dropped
    pub async fn serve(&self) -> std::io::Result<()> {
        info!(
            "Diagnostics socket listening on {}",
            self.socket_path.display()
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    let handler = self.handler.clone();
                    let notifications = self.notification_tx.subscribe();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, handler, notifications).await {
                            error!("Error handling subscriber: {}", e);
                        }
                    });
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        stream: UnixStream,
        handler: Arc<RequestHandler>,
        mut notifications: broadcast::Receiver<JsonRpcNotification>,
    ) -> std::io::Result<()> {
        let (read_half, write_half) = stream.into_split();
        let session = SubscriberSession::new(write_half);
        let mut reader = SessionReader::new(read_half);

        info!("New subscriber connected: {}", session.id());

        loop {
            tokio::select! {
                line = reader.read_line() => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let response = handler.handle_line(&line).await;
                        session.send(&response).await?;
                    }
                    None => {
                        info!("Subscriber disconnected: {}", session.id());
                        break;
                    }
                },
                notification = notifications.recv() => match notification {
                    Ok(notification) => session.send(&notification).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Subscriber {} lagging, skipped {} snapshots", session.id(), skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        Ok(())
    }
}

impl DiagnosticsSink for UnixSocketSink {
    async fn publish(&self, snapshot: &DiagnosticsSnapshot) -> SinkResult<()> {
        self.handler.store(snapshot.clone()).await;

        let notification =
            JsonRpcNotification::new(Notification::Diagnostics(snapshot.clone()));
        // No subscribers is not an error
        if let Ok(receivers) = self.notification_tx.send(notification) {
            debug!("Snapshot sent to {} subscribers", receivers);
        }

        Ok(())
    }
}

impl Drop for UnixSocketSink {
    fn drop(&mut self) {
        if self.owns_socket_file {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}
