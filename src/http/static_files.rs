//! Static file serving for the public asset tree.
//!
//! Any path without a dynamic route is looked up under `public/`; paths
//! with no matching file propagate a structured 404 into the error page
//! mapping.

use axum::handler::HandlerWithoutStateExt;
use axum::http::Uri;
use axum::Router;
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_STATIC, PUBLIC_DIR};
use crate::error::AppError;

/// Fallback for paths with neither a dynamic route nor a static asset.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Create the static file service rooted at the public directory.
///
/// Served files get a long immutable cache header; error responses set
/// their own Cache-Control, so `if_not_present` leaves those alone.
pub fn create_static_service() -> Router {
    Router::new()
        .fallback_service(ServeDir::new(PUBLIC_DIR).not_found_service(not_found.into_service()))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_service_builds() {
        // Construction must not touch the filesystem; serving is covered by
        // the router integration tests.
        let _service = create_static_service();
    }
}
