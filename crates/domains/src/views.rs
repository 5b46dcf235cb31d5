//! # View Models
//!
//! Explicit typed structs per fetch composition. The gateway's expanded
//! query results are always narrowed into one of these before they reach a
//! rendering layer; raw heterogeneous rows never travel upward.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Comment, Like, Post, PostImage};

/// One card on the home feed: a post expanded with its author name, first
/// image and engagement counts in a single gateway read.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_username: Option<String>,
    /// Public URL of the first image uploaded to the post, if any.
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

/// A comment annotated with its author's username.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author_username: Option<String>,
}

/// The merged detail view: post + author + images + annotated comments +
/// likes, plus whether the current account is among the likers.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub post: Post,
    pub author_username: Option<String>,
    pub images: Vec<PostImage>,
    pub comments: Vec<CommentView>,
    pub likes: Vec<Like>,
    /// Membership test of the current session identity against `likes`.
    /// Always false for anonymous visitors.
    pub liked: bool,
}

impl PostDetailView {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}
