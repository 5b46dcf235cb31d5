//! # GatewayError
//!
//! Centralized error type for every gateway port. Adapters map their
//! infrastructure failures into these variants; controllers only ever see
//! this shape.

use thiserror::Error;

/// The primary error type for all gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Resource not found (e.g., Post, Profile, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure caught at the gateway boundary
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential or session failure
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Object-storage failure (upload, remove)
    #[error("storage error: {0}")]
    Storage(String),

    /// Infrastructure failure (DB down, pool exhausted, ...)
    #[error("internal gateway error: {0}")]
    Internal(String),
}

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
