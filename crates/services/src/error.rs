//! Controller-level failures, layered over [`domains::GatewayError`].

use domains::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The operation needs an authenticated session; the web layer turns
    /// this into a redirect to the login page.
    #[error("sign-in required")]
    SignInRequired,

    /// The acting account does not own the targeted resource.
    #[error("only the owner may modify this resource")]
    NotOwner,

    /// A mutation was attempted before the view finished loading.
    #[error("view not loaded")]
    NotLoaded,

    /// Form validation failure, caught before any gateway call. The message
    /// is user-facing and rendered inline.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
