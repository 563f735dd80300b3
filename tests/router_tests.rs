//! Router-level integration tests.
//!
//! These drive the full middleware stack in-process with `oneshot`, without
//! binding a socket. The working directory is the crate root, so the real
//! `templates/` and `public/` trees back the requests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hearth::config::{AppConfig, CACHE_CONTROL_PAGE};
use hearth::routes::create_router;
use hearth::state::AppState;
use hearth::templates::init_templates;

fn app() -> axum::Router {
    let state = AppState::new(AppConfig::default(), init_templates().expect("templates load"));
    create_router(state)
}

async fn get(path: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn home_page_renders_html() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(!body.is_empty());
    // The default site name appears in the rendered header
    assert!(body.contains("hearth"));
}

#[tokio::test]
async fn foo_page_renders_html() {
    let response = get("/foo").await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(!body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn pages_carry_cache_control() {
    let response = get("/").await;
    assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL_PAGE);
}

#[tokio::test]
async fn static_asset_is_served_verbatim() {
    let response = get("/css/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);

    let on_disk = std::fs::read("public/css/style.css").unwrap();
    assert_eq!(body_bytes(response).await, on_disk);
}

#[tokio::test]
async fn unmatched_path_serves_numbered_error_page() {
    let response = get("/definitely/not/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let expected = std::fs::read("public/error/404.html").unwrap();
    assert_eq!(body_bytes(response).await, expected);
}
