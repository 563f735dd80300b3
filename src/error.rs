//! Request-level errors and the error page mapping.
//!
//! Any error that escapes a handler is converted here: the status code is
//! taken from the variant, the error is logged, and the numbered page under
//! `public/error/` is served as the body with the original status. When
//! that page is missing or unreadable, the secondary failure is logged and
//! the response stays a bare status code with an empty body; there is no
//! further fallback.

use std::io;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::config::{CACHE_CONTROL_ERROR, ERROR_PAGE_DIR};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Status code carried by this error. Variants without a more specific
    /// status are internal server errors.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Template(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
        }
        error_page_response(status)
    }
}

/// Path of the static page conventionally served for a status code.
fn error_page_path(status: StatusCode) -> String {
    format!("{}/{}.html", ERROR_PAGE_DIR, status.as_u16())
}

/// Build the response for a failed request: the numbered error page when it
/// exists, otherwise the bare status with an empty body. Terminal sink for
/// the error path; never fails itself.
pub fn error_page_response(status: StatusCode) -> Response {
    let path = error_page_path(status);
    let mut response = match std::fs::read_to_string(&path) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(page = %path, error = %e, "Failed to serve error page");
            status.into_response()
        }
    };
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_ERROR),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_serves_numbered_page() {
        let response = AppError::NotFound("/missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let expected = std::fs::read_to_string("public/error/404.html").unwrap();
        assert_eq!(body_string(response).await, expected);
    }

    #[tokio::test]
    async fn template_error_maps_to_500_page() {
        let error = AppError::Template(tera::Error::msg("broken template"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let expected = std::fs::read_to_string("public/error/500.html").unwrap();
        assert_eq!(body_string(response).await, expected);
    }

    #[tokio::test]
    async fn missing_error_page_leaves_bare_status() {
        // No 418.html exists; the status survives and the body stays empty.
        let response = error_page_response(StatusCode::IM_A_TEAPOT);
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(body_string(response).await.is_empty());
    }
}
