//! Periodic link-state sampling and diagnostics publishing
//!
//! Two independently scheduled cycles share one state cell: the refresh
//! cycle replaces the [`SampleState`] after every fetch, the publish cycle
//! turns whatever state is current into a [`DiagnosticsSnapshot`].

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, trace, warn};

use crate::{
    core::{
        error::{FetchError, ShellError, ShellResult},
        fetcher::LinkStatusFetcher,
        types::{DiagnosticsSnapshot, SampleState},
    },
    shell::RemoteShell,
    sink::DiagnosticsSink,
};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// What to do with the session after a transport failure
///
/// A reconnect runs inside the refresh cycle and is bounded by the shell's
/// connect timeout, not by the refresh interval. Refresh ticks elapsing
/// meanwhile are skipped; the publish cycle keeps reporting the failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReconnectPolicy {
    /// Keep using the existing session
    Never,
    /// Re-establish the session once before the next refresh
    #[default]
    OnTransportFailure,
}

/// Timing and identity of a poller
#[derive(Debug, Clone, PartialEq)]
pub struct PollerSettings {
    pub host_label: String,
    pub interface: String,
    pub refresh_interval: Duration,
    pub publish_interval: Duration,
    /// Upper bound of a single fetch
    pub fetch_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl PollerSettings {
    /// One second cycles, fetch timeout equal to the refresh interval
    pub fn new(host_label: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            host_label: host_label.into(),
            interface: interface.into(),
            refresh_interval: DEFAULT_INTERVAL,
            publish_interval: DEFAULT_INTERVAL,
            fetch_timeout: DEFAULT_INTERVAL,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Samples the link of one remote host and publishes diagnostics
pub struct DiagnosticsPoller<S: RemoteShell, K: DiagnosticsSink> {
    settings: PollerSettings,
    fetcher: LinkStatusFetcher<S>,
    sink: K,
    state: RwLock<SampleState>,
}

impl<S, K> DiagnosticsPoller<S, K>
where
    S: RemoteShell + Send,
    K: DiagnosticsSink + Send,
{
    pub fn new(settings: PollerSettings, fetcher: LinkStatusFetcher<S>, sink: K) -> Self {
        Self {
            settings,
            fetcher,
            sink,
            state: RwLock::new(SampleState::default()),
        }
    }

    pub fn settings(&self) -> &PollerSettings {
        &self.settings
    }

    /// Current sample state
    pub async fn state(&self) -> SampleState {
        self.state.read().await.clone()
    }

    /// Run one refresh: fetch, then replace the state in a single write
    pub async fn refresh_once(&self) {
        let interface = self.settings.interface.as_str();
        let timeout = self.settings.fetch_timeout;

        let result = match time::timeout(timeout, self.fetcher.fetch(interface)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Transport(ShellError::Timeout(timeout))),
        };

        let mut reconnect = false;
        let next = match result {
            Ok(status) => {
                debug!(
                    network = %status.network_name,
                    quality = status.link_quality_percent,
                    "Link state of {} refreshed", interface
                );
                SampleState::Sampled(status)
            }
            Err(e) => {
                warn!("Refreshing link state of {} failed: {}", interface, e);
                reconnect = e.is_transport();
                SampleState::Failed
            }
        };

        *self.state.write().await = next;

        if reconnect && self.settings.reconnect == ReconnectPolicy::OnTransportFailure {
            match self.fetcher.reconnect().await {
                Ok(()) => info!("Remote shell session re-established"),
                Err(e) => warn!("Reconnecting remote shell failed: {}", e),
            }
        }
    }

    /// Publish a snapshot of the current state
    pub async fn publish_once(&self) {
        let snapshot = {
            let state = self.state.read().await;
            DiagnosticsSnapshot::from_state(
                &state,
                &self.settings.host_label,
                &self.settings.interface,
                Utc::now(),
            )
        };

        match self.sink.publish(&snapshot).await {
            Ok(()) => trace!(level = ?snapshot.level, "Snapshot published"),
            Err(e) => warn!("Publishing snapshot failed: {}", e),
        }
    }

    /// Start both cycles, the first ticks fire immediately
    pub fn spawn(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let refresher = self.clone();
        let refresh = tokio::spawn(async move {
            let mut ticker = time::interval(refresher.settings.refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                refresher.refresh_once().await;
            }
        });

        let publisher = self.clone();
        let publish = tokio::spawn(async move {
            let mut ticker = time::interval(publisher.settings.publish_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                publisher.publish_once().await;
            }
        });

        info!(
            refresh = ?self.settings.refresh_interval,
            publish = ?self.settings.publish_interval,
            "Monitoring {} on {}", self.settings.interface, self.settings.host_label
        );

        vec![refresh, publish]
    }

    /// Close the remote shell session
    pub async fn shutdown(&self) -> ShellResult<()> {
        info!("Closing remote shell session");
        self.fetcher.close().await
    }
}
