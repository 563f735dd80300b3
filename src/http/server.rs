//! HTTP/HTTPS server startup logic.
//!
//! Development serves plain HTTP. Production serves TLS with certificates
//! acquired per-handshake through the ACME state machine (TLS-ALPN-01
//! challenge) and cached on disk; no static certificate files are involved.
//!
//! Either way this blocks until the listener terminates. Graceful shutdown
//! completes the serve future without an error; everything else propagates
//! as a `ServerError`.

use axum::Router;
use axum_server::Handle;
use futures::StreamExt;
use rustls_acme::caches::DirCache;
use rustls_acme::AcmeConfig;

use crate::config::{AcmeSettings, ServerConfig, PLACEHOLDER_DOMAIN};

use super::redirect;
use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP/HTTPS server for the resolved configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, server: &ServerConfig) -> Result<(), ServerError> {
    // Bind up front so a bind failure is fatal at startup, distinct from
    // errors out of the serve loop.
    let listener = std::net::TcpListener::bind(server.addr)?;
    listener.set_nonblocking(true)?;

    let handle = Handle::new();

    match &server.acme {
        None => start_plain_server(app, server, listener, handle).await,
        Some(acme) => start_acme_server(app, server, acme, listener, handle).await,
    }
}

/// Start a plain HTTP server (no TLS).
async fn start_plain_server(
    app: Router,
    server: &ServerConfig,
    listener: std::net::TcpListener,
    handle: Handle,
) -> Result<(), ServerError> {
    tracing::info!(addr = %server.addr, environment = %server.env, "Starting HTTP server (no TLS)");

    // Setup graceful shutdown
    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}

/// Start the HTTPS server with automatic ACME certificates.
async fn start_acme_server(
    app: Router,
    server: &ServerConfig,
    acme: &AcmeSettings,
    listener: std::net::TcpListener,
    handle: Handle,
) -> Result<(), ServerError> {
    let directory = if acme.directory_production {
        "production"
    } else {
        "staging"
    };
    tracing::info!(
        addr = %server.addr,
        environment = %server.env,
        domains = ?acme.domains,
        cache = %acme.cache_dir,
        directory = %directory,
        "Starting HTTPS server (ACME)"
    );

    if !acme.directory_production {
        tracing::warn!(
            "Using the Let's Encrypt staging directory - certificates will NOT be trusted by \
             browsers. Set acme_production = true for production use."
        );
    }
    if acme.domains.iter().any(|d| d == PLACEHOLDER_DOMAIN) {
        tracing::warn!(
            "tls.domain is still the placeholder '{}' - certificate issuance will fail until it \
             is set to the deployment domain",
            PLACEHOLDER_DOMAIN
        );
    }

    // Configure ACME. Terms of service are accepted implicitly by using the
    // directory; the cache directory is created lazily on first write.
    let mut config = AcmeConfig::new(acme.domains.clone())
        .directory_lets_encrypt(acme.directory_production);
    if let Some(contact) = &acme.contact {
        config = config.contact_push(format!("mailto:{}", contact));
    }
    let mut acme_state = config.cache(DirCache::new(acme.cache_dir.clone())).state();

    let acceptor = acme_state.axum_acceptor(acme_state.default_rustls_config());

    // Spawn the ACME event loop: initial order, renewals, and errors
    tokio::spawn(async move {
        loop {
            match acme_state.next().await {
                Some(Ok(event)) => {
                    tracing::info!(event = ?event, "ACME event");
                }
                Some(Err(err)) => {
                    tracing::error!(error = %err, "ACME error");
                }
                None => {
                    tracing::debug!("ACME state stream ended");
                    break;
                }
            }
        }
    });

    // Setup graceful shutdown
    shutdown::setup_shutdown_handler(handle.clone());

    // Start HTTP->HTTPS redirect if enabled
    if acme.redirect_http {
        redirect::spawn_redirect_server(acme.redirect_port, server.addr.port());
    }

    axum_server::from_tcp(listener)
        .handle(handle)
        .acceptor(acceptor)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}
