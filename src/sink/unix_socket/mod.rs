//! Unix domain socket sink streaming snapshots to subscribers

pub mod handler;
pub mod server;
pub mod session;

pub use {
    handler::RequestHandler,
    server::UnixSocketSink,
    session::{SessionReader, SubscriberSession},
};
