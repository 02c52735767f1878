//! usage-tracking gateway library entry.
//!
//! This crate wires the configuration snapshot, the shared counter registry,
//! the request dispatcher, and the server lifecycle into one service. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
