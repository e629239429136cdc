//! Wireless link monitor - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wlan_monitor::{
    config::{CliArgs, Settings},
    core::{fetcher::LinkStatusFetcher, poller::DiagnosticsPoller},
    shell::SshShell,
    sink::{JsonLinesSink, UnixSocketSink},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wlan_monitor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();
    info!(?args, "Starting wireless link monitor");

    // Validate configuration
    let settings = Settings::try_from(args).inspect_err(|e| {
        error!("Invalid configuration: {}", e);
    })?;

    if !settings.stdout && settings.socket_path.is_none() {
        warn!("No sink enabled, snapshots are discarded");
    }

    // Establish the remote shell session
    let shell = SshShell::connect(settings.ssh_config())
        .await
        .inspect_err(|e| error!("Failed to connect to {}: {}", settings.host, e))?;
    let fetcher = LinkStatusFetcher::new(shell).with_query_command(&settings.query_command);

    let mut tasks = Vec::new();

    // Start Unix socket sink
    let socket_sink = match &settings.socket_path {
        Some(path) => {
            let sink = Arc::new(
                UnixSocketSink::bind(path, settings.socket_mode)
                    .await
                    .inspect_err(|e| error!("Failed to bind {}: {}", path.display(), e))?,
            );

            let server = sink.clone();
            tasks.push(tokio::spawn(async move {
                if let Err(e) = server.serve().await {
                    error!("Unix socket server error: {}", e);
                }
            }));

            Some(sink)
        }
        None => None,
    };

    let stdout_sink = settings.stdout.then(JsonLinesSink::stdout);

    // Start refresh and publish cycles
    let poller = Arc::new(DiagnosticsPoller::new(
        settings.poller_settings(),
        fetcher,
        (stdout_sink, socket_sink),
    ));
    tasks.extend(poller.spawn());

    #[cfg(feature = "systemd")]
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        warn!("Failed to notify systemd: {}", e);
    }

    info!("Service started successfully");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        result = shutdown_signal() => match result {
            Ok(()) => info!("Received SIGTERM, shutting down gracefully"),
            Err(e) => error!("Failed to wait for SIGTERM: {}", e),
        },
        (result, _, _) = futures::future::select_all(tasks.iter_mut()) => {
            if let Err(e) = result {
                error!("Task terminated unexpectedly: {}", e);
            }
        }
    }

    info!("Shutting down...");
    for task in &tasks {
        task.abort();
    }

    if let Err(e) = poller.shutdown().await {
        warn!("Failed to close remote shell session: {}", e);
    }

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    // On non-Unix platforms, just wait forever
    std::future::pending().await
}
