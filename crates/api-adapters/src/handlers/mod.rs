//! Request handlers, one module per page.

pub mod auth;
pub mod authoring;
pub mod detail;
pub mod home;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::ApiError;

/// Renders a template into an HTML response.
pub(crate) fn render<T: Template>(template: T) -> Result<Response, ApiError> {
    Ok(Html(template.render()?).into_response())
}
