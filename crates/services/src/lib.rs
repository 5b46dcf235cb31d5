//! hobbylog/crates/services/src/lib.rs
//!
//! View-controller orchestration: each page of the site owns one controller
//! here. Controllers hold local state for the lifetime of a view, issue
//! reads and mutations against the gateway ports, and never touch a
//! rendering layer.

pub mod authoring;
pub mod detail;
pub mod error;
pub mod feed;
pub mod session;
pub mod view;

pub use authoring::{AuthoringMode, PostComposer, StagedImage};
pub use detail::PostDetail;
pub use error::ServiceError;
pub use feed::HomeFeed;
pub use session::{CurrentUser, SessionContext, SignUpForm};
pub use view::ViewState;
