//! Protocol message definitions for diagnostics subscribers

pub mod jsonrpc;
pub mod notification;
pub mod request;
pub mod response;

pub use {
    jsonrpc::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId},
    notification::Notification,
    request::Request,
    response::{Response, SnapshotResponse},
};
