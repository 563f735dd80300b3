//! Secondary page handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::instrument;

use crate::error::AppError;
use crate::render::{render, Page};
use crate::state::AppState;

#[instrument(name = "foo::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    render(&state, StatusCode::OK, Page::Foo)
}
