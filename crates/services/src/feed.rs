//! # Home Feed
//!
//! The list view: one expanded gateway read, newest first. A gateway
//! failure degrades to an empty feed rather than propagating; recovery is
//! the user reloading.

use std::sync::Arc;

use domains::{PostStore, PostSummary};
use tracing::warn;

use crate::view::ViewState;

/// Preview length of a card's content, in characters.
const PREVIEW_CHARS: usize = 80;

pub struct HomeFeed {
    posts: Arc<dyn PostStore>,
    state: ViewState<Vec<PostSummary>>,
}

impl HomeFeed {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self {
            posts,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<PostSummary>> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<Vec<PostSummary>> {
        self.state = ViewState::Loading;
        self.state = match self.posts.list_recent().await {
            Ok(posts) => ViewState::Loaded(posts),
            Err(err) => {
                warn!(error = %err, "feed fetch failed");
                ViewState::Loaded(Vec::new())
            }
        };
        &self.state
    }
}

/// First 80 characters of a post's content, with an ellipsis when trimmed.
pub fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
