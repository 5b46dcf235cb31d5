//! # Gateway Ports
//!
//! The contract of the remote data gateway: table-like stores, object
//! storage with public URL issuance, and the session authority. Controllers
//! treat every implementation as a black box; adapters implement these
//! traits to be wired in by the binary.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Account, AccountCredential, Comment, Like, NewAccount, NewComment, NewPost, NewPostImage,
    Post, PostImage, Profile, Session, SessionIdentity, SignUpOutcome,
};
use crate::views::PostSummary;

/// `posts` collection: select (all expanded / by id), insert, update, delete.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts ordered by creation time descending, each expanded with
    /// author username, first image and engagement counts (the gateway's
    /// foreign-key expansion).
    async fn list_recent(&self) -> Result<Vec<PostSummary>>;
    async fn get(&self, id: Uuid) -> Result<Option<Post>>;
    async fn insert(&self, new_post: NewPost) -> Result<Post>;
    async fn update(&self, id: Uuid, title: String, content: String) -> Result<()>;
    /// Deleting a post cascades to its images, comments and likes inside
    /// the gateway; callers never issue the cascade themselves.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// `profiles` collection: username lookup, 1:1 with accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, account_id: Uuid) -> Result<Option<Profile>>;
    /// Batch lookup by id-set, for annotating comment lists.
    async fn get_many(&self, account_ids: Vec<Uuid>) -> Result<Vec<Profile>>;
    async fn insert(&self, profile: Profile) -> Result<Profile>;
}

/// `post_images` collection: image metadata only; binaries live in
/// [`MediaStorage`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostImageStore: Send + Sync {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>>;
    async fn insert(&self, new_image: NewPostImage) -> Result<PostImage>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// `comments` collection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Ordered by creation time ascending.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;
    async fn insert(&self, new_comment: NewComment) -> Result<Comment>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// `likes` collection: unique per (post, account).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Like>>;
    /// Inserting an already-present pair is a no-op that returns the
    /// existing row; the uniqueness invariant holds either way.
    async fn insert(&self, post_id: Uuid, account_id: Uuid) -> Result<Like>;
    async fn delete(&self, post_id: Uuid, account_id: Uuid) -> Result<()>;
}

/// Object-storage bucket: upload, remove, public URL issuance.
/// Path convention: `{accountId}/{postId}/{timestamp}.{ext}`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(&self, path: String, data: Bytes, content_type: mime::Mime) -> Result<()>;
    async fn remove(&self, path: String) -> Result<()>;
    fn public_url(&self, path: &str) -> String;
    /// Inverse of [`Self::public_url`]: recovers the storage path from a
    /// URL this store issued. `None` for URLs it does not recognize.
    fn storage_path(&self, public_url: &str) -> Option<String>;
}

/// Account persistence behind the session authority. Only
/// [`SessionGateway`] implementations ever talk to this port.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, new_account: NewAccount) -> Result<AccountCredential>;
    async fn find_by_email(&self, email: String) -> Result<Option<AccountCredential>>;
    async fn get(&self, id: Uuid) -> Result<Option<Account>>;
}

/// Session/auth interface of the gateway.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Creates the account and its profile; the user still has to verify
    /// their email before signing in is expected.
    async fn sign_up(&self, email: String, password: String, username: String)
        -> Result<SignUpOutcome>;
    async fn sign_in(&self, email: String, password: String) -> Result<Session>;
    /// Resolves a previously issued token; `None` for expired or garbage
    /// tokens rather than an error, so app start stays quiet.
    async fn current_session(&self, token: String) -> Result<Option<SessionIdentity>>;
    /// Token invalidation is client-side (the cookie is dropped); the
    /// gateway only observes the sign-out for bookkeeping.
    async fn sign_out(&self, token: String) -> Result<()>;
}
