//! # In-memory gateway
//!
//! A dashmap-backed implementation of every table port plus object
//! storage. Backs the integration tests and the no-database dev loop; it
//! honors the same contracts as the Postgres adapter, including cascade
//! deletion and like uniqueness.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use domains::{
    Account, AccountCredential, AccountStore, Comment, CommentStore, GatewayError, Like,
    LikeStore, MediaStorage, NewAccount, NewComment, NewPost, NewPostImage, Post, PostImage,
    PostImageStore, PostStore, PostSummary, Profile, ProfileStore, Result,
};
use uuid::Uuid;

use crate::sniff::require_image;

#[derive(Default)]
pub struct MemoryGateway {
    accounts: DashMap<Uuid, AccountCredential>,
    profiles: DashMap<Uuid, Profile>,
    posts: DashMap<Uuid, Post>,
    images: DashMap<Uuid, PostImage>,
    comments: DashMap<Uuid, Comment>,
    likes: DashMap<(Uuid, Uuid), Like>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryGateway {
    async fn list_recent(&self) -> Result<Vec<PostSummary>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|e| e.value().clone()).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .map(|post| {
                let author_username = self.profiles.get(&post.user_id).map(|p| p.username.clone());
                let mut images: Vec<PostImage> = self
                    .images
                    .iter()
                    .filter(|e| e.value().post_id == post.id)
                    .map(|e| e.value().clone())
                    .collect();
                images.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                let like_count = self
                    .likes
                    .iter()
                    .filter(|e| e.value().post_id == post.id)
                    .count() as i64;
                let comment_count = self
                    .comments
                    .iter()
                    .filter(|e| e.value().post_id == post.id)
                    .count() as i64;
                PostSummary {
                    id: post.id,
                    title: post.title,
                    content: post.content,
                    created_at: post.created_at,
                    author_username,
                    image_url: images.first().map(|i| i.image_url.clone()),
                    like_count,
                    comment_count,
                }
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|e| e.value().clone()))
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: new_post.user_id,
            title: new_post.title,
            content: new_post.content,
            created_at: Utc::now(),
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: Uuid, title: String, content: String) -> Result<()> {
        match self.posts.get_mut(&id) {
            Some(mut entry) => {
                entry.title = title;
                entry.content = content;
                Ok(())
            }
            None => Err(GatewayError::NotFound("post".to_string(), id.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.posts.remove(&id);
        // Cascade, as the hosted schema would.
        self.images.retain(|_, img| img.post_id != id);
        self.comments.retain(|_, c| c.post_id != id);
        self.likes.retain(|_, l| l.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryGateway {
    async fn get(&self, account_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.get(&account_id).map(|e| e.value().clone()))
    }

    async fn get_many(&self, account_ids: Vec<Uuid>) -> Result<Vec<Profile>> {
        Ok(account_ids
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|e| e.value().clone()))
            .collect())
    }

    async fn insert(&self, profile: Profile) -> Result<Profile> {
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl PostImageStore for MemoryGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>> {
        let mut images: Vec<PostImage> = self
            .images
            .iter()
            .filter(|e| e.value().post_id == post_id)
            .map(|e| e.value().clone())
            .collect();
        images.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(images)
    }

    async fn insert(&self, new_image: NewPostImage) -> Result<PostImage> {
        let image = PostImage {
            id: Uuid::new_v4(),
            post_id: new_image.post_id,
            image_url: new_image.image_url,
            created_at: Utc::now(),
        };
        self.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.images.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|e| e.value().post_id == post_id)
            .map(|e| e.value().clone())
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert(&self, new_comment: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: new_comment.post_id,
            user_id: new_comment.user_id,
            content: new_comment.content,
            created_at: Utc::now(),
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.comments.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl LikeStore for MemoryGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Like>> {
        let mut likes: Vec<Like> = self
            .likes
            .iter()
            .filter(|e| e.value().post_id == post_id)
            .map(|e| e.value().clone())
            .collect();
        likes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(likes)
    }

    async fn insert(&self, post_id: Uuid, account_id: Uuid) -> Result<Like> {
        let like = self
            .likes
            .entry((post_id, account_id))
            .or_insert_with(|| Like {
                post_id,
                user_id: account_id,
                created_at: Utc::now(),
            })
            .clone();
        Ok(like)
    }

    async fn delete(&self, post_id: Uuid, account_id: Uuid) -> Result<()> {
        self.likes.remove(&(post_id, account_id));
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryGateway {
    async fn insert(&self, new_account: NewAccount) -> Result<AccountCredential> {
        let duplicate = self
            .accounts
            .iter()
            .any(|e| e.value().account.email == new_account.email);
        if duplicate {
            return Err(GatewayError::Conflict(format!(
                "email already registered: {}",
                new_account.email
            )));
        }
        let credential = AccountCredential {
            account: Account {
                id: Uuid::new_v4(),
                email: new_account.email,
                created_at: Utc::now(),
            },
            password_hash: new_account.password_hash,
        };
        self.accounts
            .insert(credential.account.id, credential.clone());
        Ok(credential)
    }

    async fn find_by_email(&self, email: String) -> Result<Option<AccountCredential>> {
        Ok(self
            .accounts
            .iter()
            .find(|e| e.value().account.email == email)
            .map(|e| e.value().clone()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|e| e.value().account.clone()))
    }
}

/// In-memory object storage with the same URL conventions as the local
/// filesystem store.
pub struct MemoryMediaStorage {
    objects: DashMap<String, Bytes>,
    url_prefix: String,
}

impl Default for MemoryMediaStorage {
    fn default() -> Self {
        Self::new("/static/uploads")
    }
}

impl MemoryMediaStorage {
    pub fn new(url_prefix: &str) -> Self {
        Self {
            objects: DashMap::new(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn object(&self, path: &str) -> Option<Bytes> {
        self.objects.get(path).map(|e| e.value().clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn upload(&self, path: String, data: Bytes, content_type: mime::Mime) -> Result<()> {
        require_image(&data, &content_type)?;
        self.objects.insert(path, data);
        Ok(())
    }

    async fn remove(&self, path: String) -> Result<()> {
        self.objects.remove(&path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path)
    }

    fn storage_path(&self, public_url: &str) -> Option<String> {
        public_url
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}
