//! Remote shell abstraction layer

#[cfg(test)]
pub mod mock_shell;
pub mod remote_shell;
pub mod ssh_shell;

pub use remote_shell::{CommandOutput, RemoteShell};
pub use ssh_shell::{SshConfig, SshShell};

#[cfg(test)]
pub use mock_shell::MockShell;
