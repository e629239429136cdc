//! Mock remote shell for testing

use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

use crate::core::error::{ShellError, ShellResult};
use crate::shell::{CommandOutput, RemoteShell};

/// Internal state for the mock shell
#[derive(Debug, Clone, Default)]
struct MockState {
    stdout: String,
    stderr: String,
    should_fail_execute: bool,
    should_fail_reconnect: bool,
    delay: Option<Duration>,
    reconnect_delay: Option<Duration>,
    executed: Vec<String>,
    reconnects: usize,
    closed: bool,
}

/// Mock remote shell for testing
///
/// Returns configurable command output without a remote host.
#[derive(Debug, Clone, Default)]
pub struct MockShell {
    inner: Arc<Mutex<MockState>>,
}

impl MockShell {
    /// Create a new mock shell with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the stdout returned by every command
    pub async fn set_output(&self, stdout: &str) {
        self.inner.lock().await.stdout = stdout.to_string();
    }

    /// Configure the stderr returned by every command
    pub async fn set_stderr(&self, stderr: &str) {
        self.inner.lock().await.stderr = stderr.to_string();
    }

    /// Configure mock to fail command execution with a transport error
    pub async fn set_execute_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_execute = should_fail;
    }

    /// Configure mock to fail reconnect attempts
    pub async fn set_reconnect_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_reconnect = should_fail;
    }

    /// Delay every command by the given duration
    pub async fn set_delay(&self, delay: Duration) {
        self.inner.lock().await.delay = Some(delay);
    }

    /// Delay every reconnect by the given duration
    pub async fn set_reconnect_delay(&self, delay: Duration) {
        self.inner.lock().await.reconnect_delay = Some(delay);
    }

    /// Commands executed so far
    pub async fn executed(&self) -> Vec<String> {
        self.inner.lock().await.executed.clone()
    }

    /// Number of reconnect calls
    pub async fn reconnects(&self) -> usize {
        self.inner.lock().await.reconnects
    }

    /// Whether close was called
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}

impl RemoteShell for MockShell {
    async fn execute(&self, command: &str) -> ShellResult<CommandOutput> {
        let state = {
            let mut state = self.inner.lock().await;
            state.executed.push(command.to_string());
            state.clone()
        };

        if let Some(delay) = state.delay {
            tokio::time::sleep(delay).await;
        }

        if state.should_fail_execute || state.closed {
            return Err(ShellError::Session {
                code: Some(255),
                stderr: "Mock connection lost".into(),
            });
        }

        Ok(CommandOutput {
            stdout: state.stdout,
            stderr: state.stderr,
            exit_code: Some(0),
        })
    }

    async fn reconnect(&self) -> ShellResult<()> {
        let delay = {
            let mut state = self.inner.lock().await;
            state.reconnects += 1;
            state.reconnect_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.inner.lock().await;
        if state.should_fail_reconnect {
            Err(ShellError::Session {
                code: Some(255),
                stderr: "Mock reconnect failure".into(),
            })
        } else {
            state.closed = false;
            Ok(())
        }
    }

    async fn close(&self) -> ShellResult<()> {
        self.inner.lock().await.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_shell_execute() {
        let shell = MockShell::new();
        shell.set_output("wlan0  IEEE 802.11").await;

        let output = shell.execute("iwconfig wlan0").await.unwrap();
        assert_eq!(output.stdout, "wlan0  IEEE 802.11");
        assert_eq!(shell.executed().await, vec!["iwconfig wlan0".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_shell_failure_and_reconnect() {
        let shell = MockShell::new();
        shell.set_execute_failure(true).await;
        assert!(shell.execute("iwconfig wlan0").await.is_err());

        shell.reconnect().await.unwrap();
        assert_eq!(shell.reconnects().await, 1);
    }

    #[tokio::test]
    async fn test_mock_shell_closed() {
        let shell = MockShell::new();
        shell.close().await.unwrap();

        assert!(shell.is_closed().await);
        assert!(shell.execute("iwconfig wlan0").await.is_err());
    }
}
