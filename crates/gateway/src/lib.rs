//! studydrive gateway: HTTP surface over the virtual file tree
//!
//! Wires the remote-store adapter and tree service behind a small REST API
//! the presentation layer talks to.

pub mod api;
pub mod config;

pub use api::{router, AppState};
pub use config::GatewayConfig;
