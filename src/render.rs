//! Renderer adapter: a status code, the HTML content type, and a rendered
//! page unit.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// A self-contained renderable page. Pages take no request-derived input;
/// the template context is built entirely from configuration, so rendering
/// the same page twice produces identical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Foo,
}

impl Page {
    /// Template file backing this page.
    pub fn template(&self) -> &'static str {
        match self {
            Page::Home => "home.html",
            Page::Foo => "foo.html",
        }
    }
}

/// Render a page with the given status code and `text/html` content type.
///
/// Rendering failures propagate to the caller; the router's error mapping
/// turns them into an error page. Once the response is produced the status
/// line is committed, so a failed render never reaches the client half-way.
pub fn render(state: &AppState, status: StatusCode, page: Page) -> Result<Response, AppError> {
    let mut context = tera::Context::new();
    context.insert("site", &state.config.site);

    let html = state.tera.render(page.template(), &context)?;
    Ok((status, Html(html)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use http_body_util::BodyExt;

    use crate::config::AppConfig;
    use crate::templates::init_templates;

    fn test_state() -> AppState {
        AppState::new(AppConfig::default(), init_templates().unwrap())
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn render_sets_status_and_html_content_type() {
        let response = render(&test_state(), StatusCode::OK, Page::Home).unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        assert!(!body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn repeated_renders_are_byte_identical() {
        let state = test_state();
        let first = render(&state, StatusCode::OK, Page::Foo).unwrap();
        let second = render(&state, StatusCode::OK, Page::Foo).unwrap();
        assert_eq!(body_string(first).await, body_string(second).await);
    }
}
