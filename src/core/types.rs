//! Domain types for wireless link monitoring

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one field of the link-state report
///
/// The label doubles as the snapshot key and as parse error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProtocolNorm,
    NetworkName,
    Mode,
    Frequency,
    AccessPoint,
    BitRate,
    TxPower,
    RetryShortLimit,
    RtsThreshold,
    FragmentThreshold,
    PowerManagement,
    LinkQuality,
    LinkQualityPercent,
    SignalLevel,
    RxInvalidNwid,
    RxInvalidCrypt,
    RxInvalidFrag,
    TxExcessiveRetries,
    InvalidMisc,
    MissedBeacon,
}

impl Field {
    /// All fields in report order
    pub const ALL: [Field; 20] = [
        Field::ProtocolNorm,
        Field::NetworkName,
        Field::Mode,
        Field::Frequency,
        Field::AccessPoint,
        Field::BitRate,
        Field::TxPower,
        Field::RetryShortLimit,
        Field::RtsThreshold,
        Field::FragmentThreshold,
        Field::PowerManagement,
        Field::LinkQuality,
        Field::LinkQualityPercent,
        Field::SignalLevel,
        Field::RxInvalidNwid,
        Field::RxInvalidCrypt,
        Field::RxInvalidFrag,
        Field::TxExcessiveRetries,
        Field::InvalidMisc,
        Field::MissedBeacon,
    ];

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Field::ProtocolNorm => "IEEE Norm",
            Field::NetworkName => "ESSID",
            Field::Mode => "Mode",
            Field::Frequency => "Frequency [GHz]",
            Field::AccessPoint => "Access Point",
            Field::BitRate => "Bit Rate [Mb/s]",
            Field::TxPower => "Tx-Power [dBm]",
            Field::RetryShortLimit => "Retry short limit",
            Field::RtsThreshold => "RTS thr",
            Field::FragmentThreshold => "Fragment thr",
            Field::PowerManagement => "Power Management",
            Field::LinkQuality => "Link Quality",
            Field::LinkQualityPercent => "Link Quality %",
            Field::SignalLevel => "Signal level [dBm]",
            Field::RxInvalidNwid => "Rx invalid nwid",
            Field::RxInvalidCrypt => "Rx invalid crypt",
            Field::RxInvalidFrag => "Rx invalid frag",
            Field::TxExcessiveRetries => "Tx excessive retries",
            Field::InvalidMisc => "Invalid misc",
            Field::MissedBeacon => "Missed beacon",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsed wireless interface status
///
/// Either fully populated by the parser or not constructed at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkStatus {
    /// Link-layer standard, e.g. `802.11bgn`
    pub protocol_norm: String,
    /// ESSID as printed by the tool
    pub network_name: String,
    pub mode: String,
    pub frequency_ghz: f64,
    /// Access point MAC address
    pub access_point: String,
    pub bit_rate_mbps: f64,
    /// Not reported by every driver
    pub tx_power_dbm: Option<f64>,
    /// Not reported by every driver
    pub retry_short_limit: Option<String>,
    pub rts_threshold: String,
    pub fragment_threshold: String,
    pub power_management: String,
    /// Raw quality ratio, e.g. `61/100`
    pub link_quality_raw: String,
    /// Quality ratio as percentage, 0..=100
    pub link_quality_percent: u8,
    pub signal_level_dbm: f64,
    pub rx_invalid_nwid: u64,
    pub rx_invalid_crypt: u64,
    pub rx_invalid_frag: u64,
    pub tx_excessive_retries: u64,
    pub invalid_misc: u64,
    pub missed_beacon: u64,
}

impl LinkStatus {
    /// Stringified value of a single field
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::ProtocolNorm => self.protocol_norm.clone(),
            Field::NetworkName => self.network_name.clone(),
            Field::Mode => self.mode.clone(),
            Field::Frequency => self.frequency_ghz.to_string(),
            Field::AccessPoint => self.access_point.clone(),
            Field::BitRate => self.bit_rate_mbps.to_string(),
            Field::TxPower => self
                .tx_power_dbm
                .map_or_else(|| "n/a".to_string(), |p| p.to_string()),
            Field::RetryShortLimit => self
                .retry_short_limit
                .clone()
                .unwrap_or_else(|| "n/a".to_string()),
            Field::RtsThreshold => self.rts_threshold.clone(),
            Field::FragmentThreshold => self.fragment_threshold.clone(),
            Field::PowerManagement => self.power_management.clone(),
            Field::LinkQuality => self.link_quality_raw.clone(),
            Field::LinkQualityPercent => self.link_quality_percent.to_string(),
            Field::SignalLevel => self.signal_level_dbm.to_string(),
            Field::RxInvalidNwid => self.rx_invalid_nwid.to_string(),
            Field::RxInvalidCrypt => self.rx_invalid_crypt.to_string(),
            Field::RxInvalidFrag => self.rx_invalid_frag.to_string(),
            Field::TxExcessiveRetries => self.tx_excessive_retries.to_string(),
            Field::InvalidMisc => self.invalid_misc.to_string(),
            Field::MissedBeacon => self.missed_beacon.to_string(),
        }
    }

    /// All fields as ordered label/value pairs
    pub fn key_values(&self) -> Vec<KeyValue> {
        Field::ALL
            .iter()
            .map(|&field| KeyValue::new(field.label(), self.value(field)))
            .collect()
    }
}

/// Diagnostics status level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StatusLevel {
    Ok = 0,
    Error = 2,
}

impl TryFrom<u8> for StatusLevel {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0 => Ok(StatusLevel::Ok),
            2 => Ok(StatusLevel::Error),
            _ => Err(()),
        }
    }
}

impl From<StatusLevel> for u8 {
    fn from(level: StatusLevel) -> Self {
        level as u8
    }
}

/// The poller's current view of the link
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleState {
    /// No refresh has completed yet
    #[default]
    NotSampled,
    /// Last refresh succeeded
    Sampled(LinkStatus),
    /// Last refresh failed (transport, parse or timeout)
    Failed,
}

impl SampleState {
    pub const OK_MESSAGE: &'static str = "OK";
    pub const FAILED_MESSAGE: &'static str = "fetch or parse failed";
    pub const NOT_SAMPLED_MESSAGE: &'static str = "not yet sampled";

    pub fn level(&self) -> StatusLevel {
        match self {
            SampleState::Sampled(_) => StatusLevel::Ok,
            SampleState::NotSampled | SampleState::Failed => StatusLevel::Error,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SampleState::Sampled(_) => Self::OK_MESSAGE,
            SampleState::NotSampled => Self::NOT_SAMPLED_MESSAGE,
            SampleState::Failed => Self::FAILED_MESSAGE,
        }
    }
}

/// Label/value pair of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Diagnostics record emitted on one publish tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsSnapshot {
    pub level: StatusLevel,
    pub message: String,
    /// Display name, `<host label> WLAN Info`
    pub name: String,
    /// Host label of the monitored device
    pub hardware_id: String,
    pub interface: String,
    pub timestamp: DateTime<Utc>,
    /// Ordered field values, empty unless `level` is OK
    pub values: Vec<KeyValue>,
}

impl DiagnosticsSnapshot {
    /// Build a snapshot from the current sample state
    pub fn from_state(
        state: &SampleState,
        host_label: &str,
        interface: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let values = match state {
            SampleState::Sampled(status) => status.key_values(),
            SampleState::NotSampled | SampleState::Failed => Vec::new(),
        };

        Self {
            level: state.level(),
            message: state.message().to_string(),
            name: format!("{host_label} WLAN Info"),
            hardware_id: host_label.to_string(),
            interface: interface.to_string(),
            timestamp,
            values,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.level == StatusLevel::Ok
    }
}

/// Session identifier for socket subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
