//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::core::poller::ReconnectPolicy;

#[derive(Parser, Clone)]
#[clap(name = "wlan-monitor", version, author)]
#[clap(about = "Wireless link monitor publishing remote iwconfig status as diagnostics")]
pub struct CliArgs {
    /// SSH target host of the monitored device
    #[clap(long, env = "WLAN_MONITOR_HOST")]
    pub host: String,

    /// Display name of the device, defaults to the host
    #[clap(long)]
    pub label: Option<String>,

    /// Wireless network interface on the remote host
    #[clap(short, long, default_value = "wlan0")]
    pub interface: String,

    /// SSH user
    #[clap(short, long, default_value = "root")]
    pub user: String,

    /// SSH password, key or agent authentication is used when absent
    #[clap(long, env = "WLAN_MONITOR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SSH port
    #[clap(short, long, default_value = "22")]
    pub port: u16,

    /// Link-state query tool run on the remote host
    #[clap(long, default_value = "iwconfig")]
    pub query_command: String,

    /// Refresh cycle interval in milliseconds
    #[clap(long, default_value = "1000")]
    pub refresh_interval_ms: u64,

    /// Publish cycle interval in milliseconds
    #[clap(long, default_value = "1000")]
    pub publish_interval_ms: u64,

    /// Fetch timeout in milliseconds, defaults to the refresh interval
    #[clap(long)]
    pub fetch_timeout_ms: Option<u64>,

    /// Timeout for establishing the SSH session in milliseconds
    #[clap(long, default_value = "10000")]
    pub connect_timeout_ms: u64,

    /// Session handling after a transport failure
    #[clap(long, value_enum, default_value = "on-transport-failure")]
    pub reconnect: ReconnectPolicy,

    /// Directory for the SSH control socket, defaults to the temp dir
    #[clap(long)]
    pub control_dir: Option<PathBuf>,

    /// Write snapshots as JSON lines to stdout
    #[clap(long, default_value = "true", action = clap::ArgAction::Set)]
    pub stdout: bool,

    /// Serve snapshots to subscribers on this Unix socket
    #[clap(long)]
    pub socket_path: Option<PathBuf>,

    /// Socket file permissions (octal, e.g., 660)
    #[clap(long, default_value = "660")]
    pub socket_mode: String,
}

impl std::fmt::Debug for CliArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliArgs")
            .field("host", &self.host)
            .field("label", &self.label)
            .field("interface", &self.interface)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("port", &self.port)
            .field("query_command", &self.query_command)
            .field("refresh_interval_ms", &self.refresh_interval_ms)
            .field("publish_interval_ms", &self.publish_interval_ms)
            .field("fetch_timeout_ms", &self.fetch_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("reconnect", &self.reconnect)
            .field("control_dir", &self.control_dir)
            .field("stdout", &self.stdout)
            .field("socket_path", &self.socket_path)
            .field("socket_mode", &self.socket_mode)
            .finish()
    }
}
