//! Runtime settings

use std::{path::PathBuf, time::Duration};

use crate::{
    config::CliArgs,
    core::{
        error::ConfigError,
        poller::{PollerSettings, ReconnectPolicy},
    },
    shell::SshConfig,
};

/// Longest interface name the kernel accepts
const MAX_INTERFACE_LEN: usize = 15;

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub label: String,
    pub interface: String,
    pub user: String,
    pub password: Option<String>,
    pub port: u16,
    pub query_command: String,
    pub refresh_interval: Duration,
    pub publish_interval: Duration,
    pub fetch_timeout: Duration,
    pub connect_timeout: Duration,
    pub reconnect: ReconnectPolicy,
    pub control_dir: PathBuf,
    pub stdout: bool,
    pub socket_path: Option<PathBuf>,
    pub socket_mode: u32,
}

impl Settings {
    /// Connection parameters of the remote shell
    pub fn ssh_config(&self) -> SshConfig {
        SshConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            control_dir: self.control_dir.clone(),
            connect_timeout: self.connect_timeout,
        }
    }

    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            host_label: self.label.clone(),
            interface: self.interface.clone(),
            refresh_interval: self.refresh_interval,
            publish_interval: self.publish_interval,
            fetch_timeout: self.fetch_timeout,
            reconnect: self.reconnect,
        }
    }
}

/// Interface names end up in a remote command line
fn validate_interface(interface: &str) -> Result<(), ConfigError> {
    let valid = (1..=MAX_INTERFACE_LEN).contains(&interface.len())
        && interface
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'));

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterface(interface.to_string()))
    }
}

fn interval(name: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    match millis {
        0 => Err(ConfigError::ZeroInterval(name)),
        millis => Ok(Duration::from_millis(millis)),
    }
}

impl TryFrom<CliArgs> for Settings {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        validate_interface(&args.interface)?;

        let refresh_interval = interval("refresh", args.refresh_interval_ms)?;
        let publish_interval = interval("publish", args.publish_interval_ms)?;
        let connect_timeout = interval("connect timeout", args.connect_timeout_ms)?;

        let fetch_timeout = match args.fetch_timeout_ms {
            Some(millis) => interval("fetch timeout", millis)?,
            None => refresh_interval,
        };
        if fetch_timeout > refresh_interval {
            return Err(ConfigError::TimeoutExceedsInterval {
                timeout: fetch_timeout,
                interval: refresh_interval,
            });
        }

        // Parse octal socket mode
        let socket_mode = u32::from_str_radix(&args.socket_mode, 8)
            .ok()
            .filter(|mode| *mode <= 0o777)
            .ok_or_else(|| ConfigError::InvalidSocketMode(args.socket_mode.clone()))?;

        Ok(Settings {
            label: args.label.unwrap_or_else(|| args.host.clone()),
            host: args.host,
            interface: args.interface,
            user: args.user,
            password: args.password,
            port: args.port,
            query_command: args.query_command,
            refresh_interval,
            publish_interval,
            fetch_timeout,
            connect_timeout,
            reconnect: args.reconnect,
            control_dir: args.control_dir.unwrap_or_else(std::env::temp_dir),
            stdout: args.stdout,
            socket_path: args.socket_path,
            socket_mode,
        })
    }
}
