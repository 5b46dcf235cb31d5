//! Mapping of controller failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domains::GatewayError;
use services::ServiceError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            // Handlers turn this into a login redirect before mapping; a
            // leak through here means a missing check, so deny.
            ServiceError::SignInRequired => ApiError::Forbidden,
            ServiceError::NotOwner => ApiError::Forbidden,
            ServiceError::NotLoaded => ApiError::NotFound,
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::Gateway(GatewayError::NotFound(..)) => ApiError::NotFound,
            ServiceError::Gateway(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError::Internal(format!("template rendering failed: {err}"))
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("malformed form data: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
