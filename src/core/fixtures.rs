//! Sample link-state reports shared by tests

/// `iwconfig wlan0` output of an associated station, colon-delimited thresholds
pub const IWCONFIG_OUTPUT: &str = r#"wlan0     IEEE 802.11bgn  ESSID:"cob4-2"
          Mode:Managed  Frequency:2.437 GHz  Access Point: 00:11:22:33:44:55
          Bit Rate=65 Mb/s   Tx-Power=15 dBm
          Retry short limit:7   RTS thr:off   Fragment thr:off
          Power Management:off
          Link Quality=41/70  Signal level=-69 dBm
          Rx invalid nwid:0  Rx invalid crypt:0  Rx invalid frag:0
          Tx excessive retries:0  Invalid misc:12   Missed beacon:0

"#;
