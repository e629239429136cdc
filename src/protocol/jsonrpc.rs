//! JSON-RPC 2.0 message envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{notification::Notification, request::Request, response::Response};

/// JSON-RPC 2.0 request wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub request: Request,
    pub id: RequestId,
}

/// JSON-RPC 2.0 response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

/// JSON-RPC 2.0 notification wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub notification: Notification,
}

/// Request ID (number, string, or null for unparseable requests)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes
impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;

    // Custom error codes
    pub const NO_SNAPSHOT: i32 = -32002;

    pub fn parse_error() -> Self {
        Self {
            code: Self::PARSE_ERROR,
            message: "Parse error".to_string(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_REQUEST,
            message: message.into(),
            data: None,
        }
    }

    pub fn no_snapshot() -> Self {
        Self {
            code: Self::NO_SNAPSHOT,
            message: "no snapshot published yet".to_string(),
            data: None,
        }
    }
}

impl JsonRpcRequest {
    pub fn new(request: Request, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            request,
            id,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(result: Response, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

impl JsonRpcNotification {
    pub fn new(notification: Notification) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DiagnosticsSnapshot, SampleState};

    #[test]
    fn test_jsonrpc_request_serialization() {
        let request = JsonRpcRequest::new(Request::GetSnapshot, RequestId::Number(1));
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"get_snapshot""#));
        assert!(json.contains(r#""id":1"#));

        let deserialized: JsonRpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_jsonrpc_request_with_string_id() {
        let request = JsonRpcRequest::new(
            Request::GetSnapshot,
            RequestId::String("abc-123".to_string()),
        );
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""id":"abc-123""#));
    }

    #[test]
    fn test_jsonrpc_request_from_client_text() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_snapshot","id":7}"#).unwrap();

        assert_eq!(request.request, Request::GetSnapshot);
        assert_eq!(request.id, RequestId::Number(7));
    }

    #[test]
    fn test_jsonrpc_response_error_with_null_id() {
        let response = JsonRpcResponse::error(JsonRpcError::parse_error(), RequestId::Null);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""code":-32700"#));
        assert!(json.contains(r#""id":null"#));
        assert!(!json.contains(r#""result""#));

        let deserialized: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, response);
    }

    #[test]
    fn test_jsonrpc_notification() {
        let snapshot = DiagnosticsSnapshot::from_state(
            &SampleState::Failed,
            "cob4-2",
            "wlan0",
            chrono::Utc::now(),
        );
        let notif = JsonRpcNotification::new(Notification::Diagnostics(snapshot));
        let json = serde_json::to_string(&notif).unwrap();

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"diagnostics""#));
        assert!(!json.contains(r#""id""#)); // notifications don't have id

        let deserialized: JsonRpcNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, notif);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcError::PARSE_ERROR, -32700);
        assert_eq!(JsonRpcError::no_snapshot().code, -32002);
        assert!(JsonRpcError::invalid_request("bad").message.contains("bad"));
    }
}
