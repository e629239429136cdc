//! JSON-RPC request handler for diagnostics subscribers

use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    core::types::DiagnosticsSnapshot,
    protocol::{
        JsonRpcError, JsonRpcRequest, JsonRpcResponse, Request, RequestId, Response,
        SnapshotResponse,
    },
};

/// Answers subscriber requests from the latest published snapshot
#[derive(Debug, Default)]
pub struct RequestHandler {
    latest: RwLock<Option<DiagnosticsSnapshot>>,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest snapshot
    pub async fn store(&self, snapshot: DiagnosticsSnapshot) {
        *self.latest.write().await = Some(snapshot);
    }

    /// Handle one raw request line
    pub async fn handle_line(&self, line: &str) -> JsonRpcResponse {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid JSON-RPC request: {}", e);
                JsonRpcResponse::error(JsonRpcError::parse_error(), RequestId::Null)
            }
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version {:?}",
                    request.jsonrpc
                )),
                request.id,
            );
        }

        match request.request {
            Request::GetSnapshot => self.handle_get_snapshot(request.id).await,
        }
    }

    async fn handle_get_snapshot(&self, id: RequestId) -> JsonRpcResponse {
        match self.latest.read().await.clone() {
            Some(snapshot) => {
                JsonRpcResponse::success(Response::Snapshot(SnapshotResponse::ok(snapshot)), id)
            }
            None => JsonRpcResponse::error(JsonRpcError::no_snapshot(), id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SampleState;

    #[tokio::test]
    async fn test_get_snapshot_before_publish() {
        let handler = RequestHandler::new();
        let response = handler
            .handle_line(r#"{"jsonrpc":"2.0","method":"get_snapshot","id":1}"#)
            .await;

        assert_eq!(response.id, RequestId::Number(1));
        assert_eq!(response.error.unwrap().code, JsonRpcError::NO_SNAPSHOT);
    }

    #[tokio::test]
    async fn test_get_snapshot_after_publish() {
        let handler = RequestHandler::new();
        let snapshot = DiagnosticsSnapshot::from_state(
            &SampleState::Failed,
            "cob4-2",
            "wlan0",
            chrono::Utc::now(),
        );
        handler.store(snapshot.clone()).await;

        let response = handler
            .handle_request(JsonRpcRequest::new(
                Request::GetSnapshot,
                RequestId::String("a".into()),
            ))
            .await;

        assert_eq!(
            response.result,
            Some(Response::Snapshot(SnapshotResponse::ok(snapshot)))
        );
    }

    #[tokio::test]
    async fn test_malformed_line() {
        let handler = RequestHandler::new();
        let response = handler.handle_line("not json").await;

        assert_eq!(response.id, RequestId::Null);
        assert_eq!(response.error.unwrap().code, JsonRpcError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_wrong_protocol_version() {
        let handler = RequestHandler::new();
        let response = handler
            .handle_line(r#"{"jsonrpc":"1.0","method":"get_snapshot","id":3}"#)
            .await;

        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }
}
