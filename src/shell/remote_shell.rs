//! Remote shell trait definition

use trait_variant::make;

use crate::core::error::ShellResult;

/// Captured result of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Remote exit code, `None` if the client was terminated by a signal
    pub exit_code: Option<i32>,
}

/// Abstraction over a long-lived remote shell session
///
/// The session is established by the implementation's constructor and
/// reused by every [`RemoteShell::execute`] call until it is closed.
#[make(Send)]
pub trait RemoteShell: Sync + 'static {
    /// Run a command on the remote host and capture its output
    ///
    /// Fails with a transport error if the session is gone or the command
    /// could not be started remotely. A command that runs and exits with
    /// a non-zero status is not a transport error.
    async fn execute(&self, command: &str) -> ShellResult<CommandOutput>;

    /// Tear down the current session and establish a new one
    async fn reconnect(&self) -> ShellResult<()>;

    /// Close the session
    async fn close(&self) -> ShellResult<()>;
}
