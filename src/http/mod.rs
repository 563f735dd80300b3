//! HTTP server module with TLS support.
//!
//! Serving has two modes, resolved from the environment once at startup:
//! - **development**: plain HTTP on the development port
//! - **production**: HTTPS with automatic ACME (Let's Encrypt) certificates,
//!   plus an optional HTTP to HTTPS redirect listener
//!
//! The server includes graceful shutdown on SIGTERM/SIGINT.

mod redirect;
mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
