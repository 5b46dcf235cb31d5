//! State shared across all request handlers: the gateway ports plus the
//! session cookie name and the metrics registry.

use std::sync::Arc;

use domains::{
    CommentStore, LikeStore, MediaStorage, PostImageStore, PostStore, ProfileStore,
    SessionGateway,
};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub images: Arc<dyn PostImageStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
    pub media: Arc<dyn MediaStorage>,
    pub auth: Arc<dyn SessionGateway>,
    pub cookie_name: String,
    pub metrics: Arc<Metrics>,
}
