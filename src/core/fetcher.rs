//! Link-state fetching over the remote shell

use tracing::debug;

use crate::{
    core::{
        error::{FetchResult, ShellResult},
        parser,
        types::LinkStatus,
    },
    shell::RemoteShell,
};

/// Default link-state query tool
pub const DEFAULT_QUERY_COMMAND: &str = "iwconfig";

/// Runs the link-state query remotely and parses its output
///
/// Owns the remote shell session for its whole lifetime.
pub struct LinkStatusFetcher<S: RemoteShell> {
    shell: S,
    query_command: String,
}

impl<S: RemoteShell> LinkStatusFetcher<S> {
    /// Create a fetcher using `iwconfig` over the given session
    pub fn new(shell: S) -> Self {
        Self {
            shell,
            query_command: DEFAULT_QUERY_COMMAND.to_string(),
        }
    }

    /// Use a different query tool (e.g. an absolute path to `iwconfig`)
    pub fn with_query_command(mut self, query_command: impl Into<String>) -> Self {
        self.query_command = query_command.into();
        self
    }

    /// Remote command line for an interface
    pub fn command_for(&self, interface: &str) -> String {
        format!("{} {}", self.query_command, interface)
    }

    /// Query and parse the link state of `interface`
    ///
    /// Exactly one remote command is issued per call.
    pub async fn fetch(&self, interface: &str) -> FetchResult<LinkStatus> {
        let output = self.shell.execute(&self.command_for(interface)).await?;

        if !output.stderr.is_empty() {
            debug!(
                exit_code = ?output.exit_code,
                "Link-state query wrote to stderr: {}", output.stderr
            );
        }

        Ok(parser::parse(&output.stdout)?)
    }

    /// Re-establish the remote shell session
    pub async fn reconnect(&self) -> ShellResult<()> {
        self.shell.reconnect().await
    }

    /// Close the remote shell session
    pub async fn close(&self) -> ShellResult<()> {
        self.shell.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{error::FetchError, fixtures::IWCONFIG_OUTPUT, types::Field},
        shell::MockShell,
    };

    #[tokio::test]
    async fn test_fetch_success() {
        let shell = MockShell::new();
        shell.set_output(IWCONFIG_OUTPUT).await;

        let fetcher = LinkStatusFetcher::new(shell.clone());
        let status = fetcher.fetch("wlan0").await.unwrap();

        assert_eq!(status.network_name, "\"cob4-2\"");
        assert_eq!(status.link_quality_percent, 59);
        assert_eq!(shell.executed().await, vec!["iwconfig wlan0".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_custom_query_command() {
        let shell = MockShell::new();
        shell.set_output(IWCONFIG_OUTPUT).await;

        let fetcher = LinkStatusFetcher::new(shell.clone()).with_query_command("/sbin/iwconfig");
        fetcher.fetch("wlp2s0").await.unwrap();

        assert_eq!(
            shell.executed().await,
            vec!["/sbin/iwconfig wlp2s0".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        let shell = MockShell::new();
        shell.set_execute_failure(true).await;

        let fetcher = LinkStatusFetcher::new(shell);
        let err = fetcher.fetch("wlan0").await.unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_parse_error() {
        let shell = MockShell::new();
        shell.set_output("wlan9     No such device\n").await;
        shell.set_stderr("wlan9     No such device").await;

        let fetcher = LinkStatusFetcher::new(shell);
        let err = fetcher.fetch("wlan9").await.unwrap_err();

        match err {
            FetchError::Parse(e) => assert_eq!(e.field, Field::ProtocolNorm),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_single_attempt() {
        let shell = MockShell::new();
        shell.set_execute_failure(true).await;

        let fetcher = LinkStatusFetcher::new(shell.clone());
        let _ = fetcher.fetch("wlan0").await;

        assert_eq!(shell.executed().await.len(), 1);
        assert_eq!(shell.reconnects().await, 0);
    }

    #[tokio::test]
    async fn test_close_and_reconnect_delegate_to_shell() {
        let shell = MockShell::new();
        let fetcher = LinkStatusFetcher::new(shell.clone());

        fetcher.close().await.unwrap();
        assert!(shell.is_closed().await);

        fetcher.reconnect().await.unwrap();
        assert!(!shell.is_closed().await);
        assert_eq!(shell.reconnects().await, 1);
    }
}
