//! Request message types

use serde::{Deserialize, Serialize};

/// Request messages from subscriber to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Get the most recently published snapshot
    GetSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_get_snapshot_serialization() {
        let request = Request::GetSnapshot;
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"method":"get_snapshot"}"#);

        let deserialized: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_request_unknown_method() {
        let result: Result<Request, _> = serde_json::from_str(r#"{"method":"scan"}"#);
        assert!(result.is_err());
    }
}
