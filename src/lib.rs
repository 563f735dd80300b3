//! Hearth: a small personal web server.
//!
//! Renders a handful of server-side HTML pages and serves a static asset
//! tree, over plain HTTP in development and automatically provisioned TLS
//! (Let's Encrypt) in production. The operating mode is resolved once at
//! startup from the `ENV` variable and passed down; nothing re-reads the
//! process environment while serving.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;
pub mod templates;
