//! HTTP route registration and the middleware stack.
//!
//! Two dynamic routes render pages; every other path falls through to the
//! static file tree under `public/`. Exact-path routes always take
//! precedence over the fallback, so the static tree cannot shadow them.
//! The middleware stack recovers panics into the mapped 500 error page,
//! bounds request duration, and tags every request with an ID for log
//! correlation.

pub mod foo;
pub mod home;

use std::any::Any;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::CACHE_CONTROL_PAGE;
use crate::error::error_page_response;
use crate::http::static_files::create_static_service;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the axum router with all routes and the middleware stack.
pub fn create_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(home::index))
        .route("/foo", get(foo::index));

    finish_router(pages, state)
}

/// Attach the static fallback, state, and middleware stack to the page
/// routes. Split out so tests can wire extra routes through the identical
/// stack.
fn finish_router(pages: Router<AppState>, state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.http.request_timeout_seconds);

    pages
        // Page routes get a short cache
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_PAGE),
        ))
        .fallback_service(create_static_service())
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::custom(recover_panic))
        // Request ID middleware - outermost so the span covers everything
        .layer(middleware::from_fn(request_id_layer))
}

/// Convert an unrecovered panic into the mapped 500 error page instead of
/// tearing down the connection.
fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    error_page_response(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::templates::init_templates;

    fn test_state() -> AppState {
        AppState::new(AppConfig::default(), init_templates().unwrap())
    }

    #[tokio::test]
    async fn handler_panic_recovers_to_error_page() {
        // A throwaway panicking route wired through the production stack.
        let pages: Router<AppState> = Router::new().route(
            "/boom",
            get(|| async {
                panic!("boom");
                #[allow(unreachable_code)]
                ()
            }),
        );
        let app = finish_router(pages, test_state());

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let expected = std::fs::read("public/error/500.html").unwrap();
        assert_eq!(body.as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn dynamic_routes_take_precedence_over_static_fallback() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/foo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        // Rendered template, not a file lookup for "foo" under public/
        assert!(std::str::from_utf8(body.as_ref()).unwrap().contains("<html"));
    }
}
