//! Notification message types (server-to-subscriber events)

use serde::{Deserialize, Serialize};

use crate::core::types::DiagnosticsSnapshot;

/// Server-to-subscriber notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Snapshot emitted on a publish tick
    Diagnostics(DiagnosticsSnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        fixtures::IWCONFIG_OUTPUT,
        parser,
        types::{SampleState, StatusLevel},
    };

    #[test]
    fn test_diagnostics_notification_ok() {
        let status = parser::parse(IWCONFIG_OUTPUT).unwrap();
        let snapshot = DiagnosticsSnapshot::from_state(
            &SampleState::Sampled(status),
            "cob4-2",
            "wlan0",
            chrono::Utc::now(),
        );
        let notif = Notification::Diagnostics(snapshot);
        let json = serde_json::to_string(&notif).unwrap();

        assert!(json.contains(r#""method":"diagnostics""#));
        assert!(json.contains(r#""level":"ok""#));
        assert!(json.contains(r#""key":"Link Quality %","value":"59""#));

        let deserialized: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, notif);
    }

    #[test]
    fn test_diagnostics_notification_error() {
        let snapshot = DiagnosticsSnapshot::from_state(
            &SampleState::NotSampled,
            "cob4-2",
            "wlan0",
            chrono::Utc::now(),
        );
        let Notification::Diagnostics(decoded) = serde_json::from_str(
            &serde_json::to_string(&Notification::Diagnostics(snapshot)).unwrap(),
        )
        .unwrap();

        assert_eq!(decoded.level, StatusLevel::Error);
        assert_eq!(decoded.message, "not yet sampled");
        assert!(decoded.values.is_empty());
    }
}
