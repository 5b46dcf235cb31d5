//! # Post Detail Orchestrator
//!
//! Assembles the merged detail view from N parallel gateway reads, then
//! supports the like-toggle and comment mutations against local state
//! without a full re-fetch.

use std::sync::Arc;

use domains::{
    CommentStore, CommentView, LikeStore, NewComment, PostDetailView, PostImageStore, PostStore,
    ProfileStore,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::view::ViewState;

pub struct PostDetail {
    posts: Arc<dyn PostStore>,
    profiles: Arc<dyn ProfileStore>,
    images: Arc<dyn PostImageStore>,
    comments: Arc<dyn CommentStore>,
    likes: Arc<dyn LikeStore>,
    state: ViewState<PostDetailView>,
}

impl PostDetail {
    pub fn new(
        posts: Arc<dyn PostStore>,
        profiles: Arc<dyn ProfileStore>,
        images: Arc<dyn PostImageStore>,
        comments: Arc<dyn CommentStore>,
        likes: Arc<dyn LikeStore>,
    ) -> Self {
        Self {
            posts,
            profiles,
            images,
            comments,
            likes,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState<PostDetailView> {
        &self.state
    }

    /// Fetch protocol: the existence check strictly precedes the secondary
    /// fetches; a missing post terminates the sequence with `NotFound` and
    /// no further reads. The secondary fetches run concurrently with no
    /// ordering among them, and assembly waits for all of them.
    pub async fn load(&mut self, post_id: Uuid, viewer: Option<Uuid>) -> &ViewState<PostDetailView> {
        self.state = ViewState::Loading;

        // 1. Post lookup
        let post = match self.posts.get(post_id).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                self.state = ViewState::NotFound;
                return &self.state;
            }
            Err(err) => {
                warn!(%post_id, error = %err, "post fetch failed");
                self.state = ViewState::Failed(err.to_string());
                return &self.state;
            }
        };

        // 2. Secondary reads in parallel
        let (author, images, comments, likes) = tokio::join!(
            self.profiles.get(post.user_id),
            self.images.list_for_post(post_id),
            self.comments.list_for_post(post_id),
            self.likes.list_for_post(post_id),
        );
        let author = author.unwrap_or_else(|err| {
            warn!(error = %err, "author profile fetch failed");
            None
        });
        let images = images.unwrap_or_else(|err| {
            warn!(error = %err, "image list fetch failed");
            Vec::new()
        });
        let comments = comments.unwrap_or_else(|err| {
            warn!(error = %err, "comment list fetch failed");
            Vec::new()
        });
        let likes = likes.unwrap_or_else(|err| {
            warn!(error = %err, "like list fetch failed");
            Vec::new()
        });

        // 3. Batch-resolve comment author profiles
        let mut author_ids: Vec<Uuid> = Vec::new();
        for comment in &comments {
            if !author_ids.contains(&comment.user_id) {
                author_ids.push(comment.user_id);
            }
        }
        let commenters = if author_ids.is_empty() {
            Vec::new()
        } else {
            self.profiles.get_many(author_ids).await.unwrap_or_else(|err| {
                warn!(error = %err, "comment profile fetch failed");
                Vec::new()
            })
        };
        let comments = comments
            .into_iter()
            .map(|comment| {
                let author_username = commenters
                    .iter()
                    .find(|p| p.id == comment.user_id)
                    .map(|p| p.username.clone());
                CommentView {
                    comment,
                    author_username,
                }
            })
            .collect();

        let liked = viewer
            .map(|viewer| likes.iter().any(|l| l.user_id == viewer))
            .unwrap_or(false);

        self.state = ViewState::Loaded(PostDetailView {
            post,
            author_username: author.map(|p| p.username),
            images,
            comments,
            likes,
            liked,
        });
        &self.state
    }

    /// Optimistic like toggle. No debouncing: two rapid invocations race to
    /// the gateway and the local state reflects the last completed request.
    pub async fn toggle_like(&mut self, viewer: Option<Uuid>) -> Result<()> {
        let viewer = viewer.ok_or(ServiceError::SignInRequired)?;
        let view = self.state.loaded_mut().ok_or(ServiceError::NotLoaded)?;
        let post_id = view.post.id;

        if view.liked {
            self.likes.delete(post_id, viewer).await?;
            view.likes.retain(|l| l.user_id != viewer);
            view.liked = false;
        } else {
            let like = self.likes.insert(post_id, viewer).await?;
            view.likes.push(like);
            view.liked = true;
        }
        Ok(())
    }

    /// Inserts a trimmed comment and appends it, annotated with its
    /// author's re-resolved username, to local state. Whitespace-only input
    /// is dropped without issuing any gateway call.
    pub async fn add_comment(&mut self, viewer: Option<Uuid>, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let viewer = viewer.ok_or(ServiceError::SignInRequired)?;
        let view = self.state.loaded_mut().ok_or(ServiceError::NotLoaded)?;

        let comment = self
            .comments
            .insert(NewComment {
                post_id: view.post.id,
                user_id: viewer,
                content: text.to_string(),
            })
            .await?;
        let author_username = match self.profiles.get(viewer).await {
            Ok(profile) => profile.map(|p| p.username),
            Err(err) => {
                warn!(error = %err, "comment author profile fetch failed");
                None
            }
        };
        view.comments.push(CommentView {
            comment,
            author_username,
        });
        Ok(())
    }

    /// Deletes the viewer's own comment remotely, then removes the single
    /// matching entry from local state.
    pub async fn delete_comment(&mut self, viewer: Option<Uuid>, comment_id: Uuid) -> Result<()> {
        let viewer = viewer.ok_or(ServiceError::SignInRequired)?;
        let view = self.state.loaded_mut().ok_or(ServiceError::NotLoaded)?;
        let owns = view
            .comments
            .iter()
            .any(|c| c.comment.id == comment_id && c.comment.user_id == viewer);
        if !owns {
            return Err(ServiceError::NotOwner);
        }

        self.comments.delete(comment_id).await?;
        view.comments.retain(|c| c.comment.id != comment_id);
        Ok(())
    }

    /// Deletes the post itself. Cascading deletion of images, comments and
    /// likes is the gateway's responsibility.
    pub async fn delete_post(&mut self, viewer: Option<Uuid>) -> Result<()> {
        let viewer = viewer.ok_or(ServiceError::SignInRequired)?;
        let view = self.state.loaded().ok_or(ServiceError::NotLoaded)?;
        if view.post.user_id != viewer {
            return Err(ServiceError::NotOwner);
        }

        self.posts.delete(view.post.id).await?;
        self.state = ViewState::Idle;
        Ok(())
    }
}
