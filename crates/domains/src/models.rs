//! # Domain Models
//!
//! These structs represent the core entities of hobbylog as the client
//! consumes them; authoritative storage lives behind the gateway ports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated account as the application sees it.
/// Credentials never leave the gateway; see [`AccountCredential`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Display identity, 1:1 with an [`Account`]. Created alongside the account
/// at sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Same value as the owning account id.
    pub id: Uuid,
    pub username: String,
}

/// A diary/hobby post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Owning account id.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Image metadata attached to a post. The binary lives in object storage;
/// `image_url` is the public URL issued for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImage {
    pub id: Uuid,
    pub post_id: Uuid,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A comment under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Authoring account id.
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A like: presence/absence only, unique per (post, account).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post; the gateway assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Insert payload for a post image row.
#[derive(Debug, Clone)]
pub struct NewPostImage {
    pub post_id: Uuid,
    pub image_url: String,
}

/// Insert payload for a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

/// Insert payload for an account record.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
}

/// An account together with its stored credential hash. Only the session
/// gateway ever handles this shape.
#[derive(Debug, Clone)]
pub struct AccountCredential {
    pub account: Account,
    pub password_hash: String,
}

/// The identity carried by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub account_id: Uuid,
    pub email: String,
}

/// An issued session: identity plus the signed token the client holds.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: SessionIdentity,
    pub token: String,
}

/// Result of a successful sign-up. The account exists but the user still
/// has to confirm their email before their first sign-in is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    PendingVerification,
}
