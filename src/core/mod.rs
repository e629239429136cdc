//! Core monitoring logic

pub mod error;
pub mod fetcher;
#[cfg(test)]
pub mod fixtures;
pub mod parser;
pub mod poller;
pub mod types;
