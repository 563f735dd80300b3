//! HTTP to HTTPS redirect listener.
//!
//! In production a lightweight listener on the plain HTTP port issues
//! permanent redirects to the TLS port. Runs in the background and never
//! blocks the TLS listener; failures are logged, not fatal.

use std::net::SocketAddr;

use axum::http::{StatusCode, Uri};
use axum::response::Redirect;
use axum::routing::any;
use axum::Router;
use axum_extra::extract::Host;

/// Spawn an HTTP server that redirects all requests to HTTPS.
pub fn spawn_redirect_server(http_port: u16, https_port: u16) {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], http_port));

        tracing::info!(
            http_port = %http_port,
            https_port = %https_port,
            "Starting HTTP->HTTPS redirect listener"
        );

        let app = Router::new().fallback(any(move |Host(host): Host, uri: Uri| async move {
            redirect_to_https(host, uri, https_port)
        }));

        if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
            tracing::error!(error = %e, "HTTP redirect listener failed");
        }
    });
}

/// Generate a redirect response from HTTP to HTTPS.
fn redirect_to_https(host: String, uri: Uri, https_port: u16) -> Result<Redirect, StatusCode> {
    let host_without_port = host.split(':').next().unwrap_or(&host);
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let https_url = if https_port == 443 {
        format!("https://{}{}", host_without_port, path)
    } else {
        format!("https://{}:{}{}", host_without_port, https_port, path)
    };

    Ok(Redirect::permanent(&https_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn strips_port_and_preserves_path_and_query() {
        let redirect =
            redirect_to_https("example.com:80".to_string(), "/foo?a=1".parse().unwrap(), 443)
                .unwrap();
        let response = redirect.into_response();
        assert_eq!(response.headers()["location"], "https://example.com/foo?a=1");
    }

    #[test]
    fn non_default_https_port_is_explicit() {
        let redirect =
            redirect_to_https("example.com".to_string(), "/".parse().unwrap(), 8443).unwrap();
        let response = redirect.into_response();
        assert_eq!(response.headers()["location"], "https://example.com:8443/");
    }
}
