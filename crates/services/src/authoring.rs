//! # Post Authoring Orchestrator
//!
//! Create-or-edit of a post plus a variable-length set of staged image
//! uploads. The post-row write strictly precedes all uploads; uploads run
//! one at a time in selection order, and an individual failure is skipped
//! without aborting the submission.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use domains::{
    MediaStorage, NewPost, NewPostImage, PostImage, PostImageStore, PostStore,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringMode {
    Create,
    Edit(Uuid),
}

/// A locally held, not-yet-persisted file selected for attachment. The
/// bytes double as the preview resource: removing a staged image drops them
/// immediately, so repeated add/remove cycles hold no residual memory.
pub struct StagedImage {
    pub file_name: String,
    pub content_type: mime::Mime,
    bytes: Bytes,
}

impl StagedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub struct PostComposer {
    posts: Arc<dyn PostStore>,
    images: Arc<dyn PostImageStore>,
    media: Arc<dyn MediaStorage>,
    mode: AuthoringMode,
    pub title: String,
    pub content: String,
    staged: Vec<StagedImage>,
    existing_images: Vec<PostImage>,
}

impl std::fmt::Debug for PostComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostComposer")
            .field("mode", &self.mode)
            .field("title", &self.title)
            .field("content", &self.content)
            .field("staged", &self.staged.len())
            .field("existing_images", &self.existing_images.len())
            .finish_non_exhaustive()
    }
}

impl PostComposer {
    /// A blank composer for a new post.
    pub fn compose(
        posts: Arc<dyn PostStore>,
        images: Arc<dyn PostImageStore>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            images,
            media,
            mode: AuthoringMode::Create,
            title: String::new(),
            content: String::new(),
            staged: Vec::new(),
            existing_images: Vec::new(),
        }
    }

    /// Edit-mode load: ownership is verified before any field is populated.
    /// A missing post or a non-owner viewer errors out so the caller
    /// redirects away immediately.
    pub async fn edit(
        posts: Arc<dyn PostStore>,
        images: Arc<dyn PostImageStore>,
        media: Arc<dyn MediaStorage>,
        post_id: Uuid,
        viewer: Uuid,
    ) -> Result<Self> {
        let post = posts
            .get(post_id)
            .await?
            .ok_or_else(|| ServiceError::Gateway(domains::GatewayError::NotFound(
                "post".to_string(),
                post_id.to_string(),
            )))?;
        if post.user_id != viewer {
            return Err(ServiceError::NotOwner);
        }

        let existing_images = images.list_for_post(post_id).await.unwrap_or_else(|err| {
            warn!(error = %err, "existing image fetch failed");
            Vec::new()
        });
        Ok(Self {
            posts,
            images,
            media,
            mode: AuthoringMode::Edit(post_id),
            title: post.title,
            content: post.content,
            staged: Vec::new(),
            existing_images,
        })
    }

    pub fn mode(&self) -> &AuthoringMode {
        &self.mode
    }

    pub fn staged(&self) -> &[StagedImage] {
        &self.staged
    }

    pub fn existing_images(&self) -> &[PostImage] {
        &self.existing_images
    }

    /// Total bytes currently held for previews.
    pub fn staged_bytes(&self) -> usize {
        self.staged.iter().map(StagedImage::len).sum()
    }

    /// Appends a selected file to the ordered pending-upload list.
    pub fn stage(&mut self, file_name: String, content_type: mime::Mime, bytes: Bytes) {
        self.staged.push(StagedImage {
            file_name,
            content_type,
            bytes,
        });
    }

    /// Removes a pending upload, releasing its preview bytes immediately.
    pub fn remove_staged(&mut self, index: usize) {
        if index < self.staged.len() {
            drop(self.staged.remove(index));
        }
    }

    /// Submit protocol:
    /// 1. trimmed title/content must be non-empty — no gateway call issued
    ///    otherwise;
    /// 2. the post row is written (update in edit mode, insert-and-capture
    ///    in create mode); a failure here aborts before any image work and
    ///    leaves the form and staged files intact for retry;
    /// 3. staged files upload sequentially; each success is followed by a
    ///    metadata-row insert; each failure is logged and skipped;
    /// 4. the resulting post id is returned for navigation.
    pub async fn submit(&mut self, author: Uuid) -> Result<Uuid> {
        // 1. Validation
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(ServiceError::Validation(
                "제목과 내용을 입력해 주세요.".to_string(),
            ));
        }

        // 2. Post row write
        let post_id = match self.mode {
            AuthoringMode::Edit(id) => {
                self.posts.update(id, title, content).await?;
                id
            }
            AuthoringMode::Create => {
                let post = self
                    .posts
                    .insert(NewPost {
                        user_id: author,
                        title,
                        content,
                    })
                    .await?;
                post.id
            }
        };

        // 3. Image uploads, one at a time in selection order
        let mut last_stamp = 0i64;
        for staged in self.staged.drain(..) {
            let ext = staged.file_name.rsplit('.').next().unwrap_or("bin");
            // Consecutive uploads can share a wall-clock millisecond; the
            // stamp stays strictly increasing so paths never collide.
            let mut stamp = Utc::now().timestamp_millis();
            if stamp <= last_stamp {
                stamp = last_stamp + 1;
            }
            last_stamp = stamp;
            let path = format!("{}/{}/{}.{}", author, post_id, stamp, ext);
            match self
                .media
                .upload(path.clone(), staged.bytes, staged.content_type)
                .await
            {
                Ok(()) => {
                    let image_url = self.media.public_url(&path);
                    if let Err(err) = self
                        .images
                        .insert(NewPostImage { post_id, image_url })
                        .await
                    {
                        warn!(%path, error = %err, "image row insert failed; skipping");
                    }
                }
                Err(err) => {
                    warn!(%path, error = %err, "image upload failed; skipping");
                }
            }
        }

        Ok(post_id)
    }

    /// Edit-mode removal of an already-persisted image: backing object
    /// first, metadata row second, local state last. Both deletes are
    /// best-effort; a storage failure is logged and does not keep the row.
    pub async fn remove_existing_image(&mut self, image_id: Uuid) -> Result<()> {
        let image = self
            .existing_images
            .iter()
            .find(|img| img.id == image_id)
            .ok_or(ServiceError::NotLoaded)?;

        if let Some(path) = self.media.storage_path(&image.image_url) {
            if let Err(err) = self.media.remove(path).await {
                warn!(error = %err, "stored object removal failed");
            }
        }
        self.images.delete(image_id).await?;
        self.existing_images.retain(|img| img.id != image_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{
        GatewayError, MockMediaStorage, MockPostImageStore, MockPostStore, Post,
    };

    fn post(id: Uuid, user_id: Uuid) -> Post {
        Post {
            id,
            user_id,
            title: "오늘의 다꾸".to_string(),
            content: "스티커를 새로 샀다".to_string(),
            created_at: Utc::now(),
        }
    }

    fn jpeg_bytes() -> Bytes {
        Bytes::from_static(b"\xff\xd8\xff\xe0fake")
    }

    #[tokio::test]
    async fn blank_fields_abort_before_any_gateway_call() {
        // No expectations anywhere: any call would panic.
        let mut composer = PostComposer::compose(
            Arc::new(MockPostStore::new()),
            Arc::new(MockPostImageStore::new()),
            Arc::new(MockMediaStorage::new()),
        );
        composer.title = "  ".to_string();
        composer.content = "본문".to_string();

        let err = composer.submit(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn create_inserts_then_uploads_in_order() {
        let author = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPostStore::new();
        posts.expect_insert().times(1).returning(move |new| {
            assert_eq!(new.title, "오늘의 다꾸");
            Ok(Post {
                id: post_id,
                user_id: new.user_id,
                title: new.title,
                content: new.content,
                created_at: Utc::now(),
            })
        });

        let mut media = MockMediaStorage::new();
        media
            .expect_upload()
            .times(2)
            .returning(|_, _, _| Ok(()));
        media
            .expect_public_url()
            .returning(|path| format!("/static/uploads/{path}"));

        let mut images = MockPostImageStore::new();
        images.expect_insert().times(2).returning(|new| {
            Ok(PostImage {
                id: Uuid::new_v4(),
                post_id: new.post_id,
                image_url: new.image_url,
                created_at: Utc::now(),
            })
        });

        let mut composer =
            PostComposer::compose(Arc::new(posts), Arc::new(images), Arc::new(media));
        composer.title = " 오늘의 다꾸 ".to_string();
        composer.content = "스티커를 새로 샀다".to_string();
        composer.stage("one.jpg".to_string(), mime::IMAGE_JPEG, jpeg_bytes());
        composer.stage("two.png".to_string(), mime::IMAGE_PNG, jpeg_bytes());

        let result = composer.submit(author).await.unwrap();
        assert_eq!(result, post_id);
        assert!(composer.staged().is_empty());
    }

    #[tokio::test]
    async fn failed_upload_is_skipped_and_submission_still_lands() {
        let author = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut posts = MockPostStore::new();
        posts.expect_insert().times(1).returning(move |new| {
            Ok(Post {
                id: post_id,
                user_id: new.user_id,
                title: new.title,
                content: new.content,
                created_at: Utc::now(),
            })
        });

        let mut media = MockMediaStorage::new();
        let mut call = 0;
        media.expect_upload().times(2).returning(move |_, _, _| {
            call += 1;
            if call == 1 {
                Err(GatewayError::Storage("bucket rejected".into()))
            } else {
                Ok(())
            }
        });
        media
            .expect_public_url()
            .returning(|path| format!("/static/uploads/{path}"));

        // Exactly one metadata row: the failed upload never reaches insert.
        let mut images = MockPostImageStore::new();
        images.expect_insert().times(1).returning(|new| {
            Ok(PostImage {
                id: Uuid::new_v4(),
                post_id: new.post_id,
                image_url: new.image_url,
                created_at: Utc::now(),
            })
        });

        let mut composer =
            PostComposer::compose(Arc::new(posts), Arc::new(images), Arc::new(media));
        composer.title = "오늘의 다꾸".to_string();
        composer.content = "본문".to_string();
        composer.stage("broken.jpg".to_string(), mime::IMAGE_JPEG, jpeg_bytes());
        composer.stage("fine.jpg".to_string(), mime::IMAGE_JPEG, jpeg_bytes());

        let result = composer.submit(author).await.unwrap();
        assert_eq!(result, post_id);
    }

    #[tokio::test]
    async fn post_row_failure_aborts_before_image_work_and_keeps_the_form() {
        let mut posts = MockPostStore::new();
        posts
            .expect_insert()
            .returning(|_| Err(GatewayError::Internal("write refused".into())));
        // Media and image mocks carry no expectations: reaching them panics.
        let mut composer = PostComposer::compose(
            Arc::new(posts),
            Arc::new(MockPostImageStore::new()),
            Arc::new(MockMediaStorage::new()),
        );
        composer.title = "오늘의 다꾸".to_string();
        composer.content = "본문".to_string();
        composer.stage("one.jpg".to_string(), mime::IMAGE_JPEG, jpeg_bytes());

        let err = composer.submit(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(_)));
        assert_eq!(composer.title, "오늘의 다꾸");
        assert_eq!(composer.staged().len(), 1);
    }

    #[tokio::test]
    async fn staging_cycles_release_preview_bytes() {
        let mut composer = PostComposer::compose(
            Arc::new(MockPostStore::new()),
            Arc::new(MockPostImageStore::new()),
            Arc::new(MockMediaStorage::new()),
        );

        for _ in 0..50 {
            composer.stage("a.jpg".to_string(), mime::IMAGE_JPEG, jpeg_bytes());
            composer.remove_staged(0);
        }
        assert!(composer.staged().is_empty());
        assert_eq!(composer.staged_bytes(), 0);
    }

    #[tokio::test]
    async fn edit_load_redirects_non_owners_before_populating() {
        let post_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let mut posts = MockPostStore::new();
        posts
            .expect_get()
            .returning(move |id| Ok(Some(post(id, owner))));
        // The image store carries no expectation: ownership fails first.
        let err = PostComposer::edit(
            Arc::new(posts),
            Arc::new(MockPostImageStore::new()),
            Arc::new(MockMediaStorage::new()),
            post_id,
            stranger,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotOwner));
    }

    #[tokio::test]
    async fn edit_load_populates_fields_and_existing_images() {
        let post_id = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut posts = MockPostStore::new();
        posts
            .expect_get()
            .returning(move |id| Ok(Some(post(id, owner))));
        let mut images = MockPostImageStore::new();
        images.expect_list_for_post().returning(|pid| {
            Ok(vec![PostImage {
                id: Uuid::new_v4(),
                post_id: pid,
                image_url: "/static/uploads/a/b/1.jpg".to_string(),
                created_at: Utc::now(),
            }])
        });

        let composer = PostComposer::edit(
            Arc::new(posts),
            Arc::new(images),
            Arc::new(MockMediaStorage::new()),
            post_id,
            owner,
        )
        .await
        .unwrap();
        assert_eq!(composer.mode(), &AuthoringMode::Edit(post_id));
        assert_eq!(composer.title, "오늘의 다꾸");
        assert_eq!(composer.existing_images().len(), 1);
    }

    #[tokio::test]
    async fn removing_an_existing_image_deletes_object_then_row() {
        let post_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let image_id = Uuid::new_v4();

        let mut posts = MockPostStore::new();
        posts
            .expect_get()
            .returning(move |id| Ok(Some(post(id, owner))));
        let mut images = MockPostImageStore::new();
        images.expect_list_for_post().returning(move |pid| {
            Ok(vec![PostImage {
                id: image_id,
                post_id: pid,
                image_url: "/static/uploads/acc/post/1.jpg".to_string(),
                created_at: Utc::now(),
            }])
        });
        images
            .expect_delete()
            .times(1)
            .withf(move |id| *id == image_id)
            .returning(|_| Ok(()));
        let mut media = MockMediaStorage::new();
        media
            .expect_storage_path()
            .returning(|url| url.strip_prefix("/static/uploads/").map(str::to_string));
        media
            .expect_remove()
            .times(1)
            .withf(|path| path == "acc/post/1.jpg")
            .returning(|_| Ok(()));

        let mut composer = PostComposer::edit(
            Arc::new(posts),
            Arc::new(images),
            Arc::new(media),
            post_id,
            owner,
        )
        .await
        .unwrap();

        composer.remove_existing_image(image_id).await.unwrap();
        assert!(composer.existing_images().is_empty());
    }
}
