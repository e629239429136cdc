//! OpenSSH client backed remote shell
//!
//! A control master (`ssh -M`) is started once and owned by the shell.
//! Every command multiplexes over the master's control socket, so the
//! authentication cost is paid only when the session is (re)established.

use std::{
    path::{Path, PathBuf},
    process::{Output, Stdio},
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader},
    process::{Child, Command},
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    core::error::{ShellError, ShellResult},
    shell::{CommandOutput, RemoteShell},
};

const SSH: &str = "ssh";
const SSHPASS: &str = "sshpass";
const MASTER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Exit code of the ssh client when the connection itself failed
const SSH_CONNECTION_ERROR: i32 = 255;

/// Connection parameters for [`SshShell`]
#[derive(Clone)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Plaintext password, key or agent authentication when `None`
    pub password: Option<String>,
    /// Directory holding the control socket
    pub control_dir: PathBuf,
    /// Upper bound for establishing the master connection
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("control_dir", &self.control_dir)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Remote shell over a persistent OpenSSH control master
#[derive(Debug)]
pub struct SshShell {
    config: SshConfig,
    control_path: PathBuf,
    master: Mutex<Option<Child>>,
}

impl SshShell {
    /// Establish the master connection
    pub async fn connect(config: SshConfig) -> ShellResult<Self> {
        let control_path = config
            .control_dir
            .join(format!("wlan-monitor-{}.ctl", uuid::Uuid::new_v4().simple()));

        let shell = Self {
            config,
            control_path,
            master: Mutex::new(None),
        };
        shell.open_master().await?;

        Ok(shell)
    }

    /// Path of the control socket
    pub fn control_path(&self) -> &Path {
        &self.control_path
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.config.user, self.config.host)
    }

    /// Child process without stdin that dies with its handle
    fn ssh_command(program: &str) -> Command {
        let mut cmd = Command::new(program);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn add_target_args(&self, cmd: &mut Command) {
        cmd.arg("-S")
            .arg(&self.control_path)
            .arg("-p")
            .arg(self.config.port.to_string())
            .arg(self.destination());
    }

    fn master_command(&self) -> Command {
        let mut cmd = match &self.config.password {
            Some(password) => {
                let mut cmd = Self::ssh_command(SSHPASS);
                cmd.env("SSHPASS", password).arg("-e").arg(SSH);
                cmd
            }
            None => {
                let mut cmd = Self::ssh_command(SSH);
                cmd.args(["-o", "BatchMode=yes"]);
                cmd
            }
        };

        cmd.args(["-M", "-N"])
            .args(["-o", "ControlPersist=no"])
            .args(["-o", "ServerAliveInterval=5"])
            .args(["-o", "ServerAliveCountMax=3"])
            .args(["-o", "LogLevel=ERROR"])
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        self.add_target_args(&mut cmd);
        cmd
    }

    fn control_command(&self, operation: &str) -> Command {
        let mut cmd = Self::ssh_command(SSH);
        cmd.args(["-O", operation])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        self.add_target_args(&mut cmd);
        cmd
    }

    /// Whether the master answers on the control socket
    async fn master_alive(&self) -> bool {
        matches!(
            self.control_command("check").status().await,
            Ok(status) if status.success()
        )
    }

    async fn open_master(&self) -> ShellResult<()> {
        debug!(
            "Starting ssh master for {} via {}",
            self.destination(),
            self.control_path.display()
        );

        let mut child = self.master_command().spawn()?;
        let deadline = Instant::now() + self.config.connect_timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    let _ = pipe.read_to_string(&mut stderr).await;
                }
                return Err(ShellError::Session {
                    code: status.code(),
                    stderr: stderr.trim().to_string(),
                });
            }

            if self.master_alive().await {
                break;
            }

            if Instant::now() >= deadline {
                let _ = child.kill().await;
                return Err(ShellError::Timeout(self.config.connect_timeout));
            }

            time::sleep(MASTER_POLL_INTERVAL).await;
        }

        info!("Remote shell session established to {}", self.destination());
        if let Some(stderr) = child.stderr.take() {
            forward_stderr(stderr, self.destination());
        }
        *self.master.lock().await = Some(child);
        Ok(())
    }

    async fn close_master(&self) -> ShellResult<()> {
        let Some(mut child) = self.master.lock().await.take() else {
            return Ok(());
        };

        if let Err(e) = self.control_command("exit").status().await {
            warn!("Failed to request ssh master exit: {}", e);
        }

        if child.try_wait()?.is_none() {
            child.kill().await?;
        }

        debug!("Remote shell session to {} closed", self.destination());
        Ok(())
    }

    fn classify(output: Output) -> ShellResult<CommandOutput> {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        match output.status.code() {
            None | Some(SSH_CONNECTION_ERROR) => Err(ShellError::Session {
                code: output.status.code(),
                stderr,
            }),
            Some(code @ (126 | 127)) => Err(ShellError::CommandRejected { code, stderr }),
            exit_code => Ok(CommandOutput {
                stdout,
                stderr,
                exit_code,
            }),
        }
    }
}

/// Drain the master's diagnostics into the log until it exits
fn forward_stderr<R>(stderr: R, destination: String) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => debug!("ssh master {}: {}", destination, line.trim()),
                Ok(None) => break,
                Err(e) => {
                    warn!("Reading ssh master output failed: {}", e);
                    break;
                }
            }
        }
    })
}

impl RemoteShell for SshShell {
    async fn execute(&self, command: &str) -> ShellResult<CommandOutput> {
        if self.master.lock().await.is_none() {
            return Err(ShellError::NotConnected);
        }

        debug!("Executing remote command: {}", command);

        let mut cmd = Self::ssh_command(SSH);
        cmd.args(["-o", "ControlMaster=no"])
            .args(["-o", "BatchMode=yes"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        self.add_target_args(&mut cmd);
        cmd.arg(command);

        Self::classify(cmd.output().await?)
    }

    async fn reconnect(&self) -> ShellResult<()> {
        info!("Reconnecting remote shell to {}", self.destination());
        self.close_master().await?;
        self.open_master().await
    }

    async fn close(&self) -> ShellResult<()> {
        self.close_master().await
    }
}
