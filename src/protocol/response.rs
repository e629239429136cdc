//! Response message types

use serde::{Deserialize, Serialize};

use crate::core::types::DiagnosticsSnapshot;

/// Response messages from server to subscriber
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    /// Latest snapshot
    Snapshot(SnapshotResponse),
}

/// Response for get_snapshot request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotResponse {
    pub status: String,
    pub snapshot: DiagnosticsSnapshot,
}

impl SnapshotResponse {
    pub fn ok(snapshot: DiagnosticsSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            snapshot,
        }
    }
}
