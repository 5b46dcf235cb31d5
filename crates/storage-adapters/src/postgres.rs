//! # Postgres gateway
//!
//! Maps the relational schema onto the domain models. Mapping is manual
//! (`Row::get`) so the domain structs stay free of persistence derives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Account, AccountCredential, AccountStore, Comment, CommentStore, GatewayError, Like,
    LikeStore, NewAccount, NewComment, NewPost, NewPostImage, Post, PostImage, PostImageStore,
    PostStore, PostSummary, Profile, ProfileStore, Result,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(internal)?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn internal(err: sqlx::Error) -> GatewayError {
    GatewayError::Internal(err.to_string())
}

fn map_post(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn map_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn map_image(row: &PgRow) -> PostImage {
    PostImage {
        id: row.get("id"),
        post_id: row.get("post_id"),
        image_url: row.get("image_url"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn map_like(row: &PgRow) -> Like {
    Like {
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

#[async_trait]
impl PostStore for PostgresGateway {
    /// The feed expansion happens gateway-side, as one query.
    async fn list_recent(&self) -> Result<Vec<PostSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.user_id, p.title, p.content, p.created_at,
                   pr.username,
                   (SELECT pi.image_url FROM post_images pi
                     WHERE pi.post_id = p.id
                     ORDER BY pi.created_at ASC LIMIT 1)           AS image_url,
                   (SELECT COUNT(*) FROM likes l
                     WHERE l.post_id = p.id)                       AS like_count,
                   (SELECT COUNT(*) FROM comments c
                     WHERE c.post_id = p.id)                       AS comment_count
              FROM posts p
              LEFT JOIN profiles pr ON pr.id = p.user_id
             ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;

        Ok(rows
            .into_iter()
            .map(|row| PostSummary {
                id: row.get("id"),
                title: row.get("title"),
                content: row.get("content"),
                created_at: row.get::<DateTime<Utc>, _>("created_at"),
                author_username: row.get("username"),
                image_url: row.get("image_url"),
                like_count: row.get("like_count"),
                comment_count: row.get("comment_count"),
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, user_id, title, content, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        Ok(row.as_ref().map(map_post))
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, content, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_post.user_id)
        .bind(new_post.title)
        .bind(new_post.content)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;
        Ok(map_post(&row))
    }

    async fn update(&self, id: Uuid, title: String, content: String) -> Result<()> {
        let result = sqlx::query("UPDATE posts SET title = $1, content = $2 WHERE id = $3")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound("post".to_string(), id.to_string()));
        }
        Ok(())
    }

    /// Children go with the post via `ON DELETE CASCADE`.
    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PostgresGateway {
    async fn get(&self, account_id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query("SELECT id, username FROM profiles WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|row| Profile {
            id: row.get("id"),
            username: row.get("username"),
        }))
    }

    async fn get_many(&self, account_ids: Vec<Uuid>) -> Result<Vec<Profile>> {
        let rows = sqlx::query("SELECT id, username FROM profiles WHERE id = ANY($1)")
            .bind(account_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|row| Profile {
                id: row.get("id"),
                username: row.get("username"),
            })
            .collect())
    }

    async fn insert(&self, profile: Profile) -> Result<Profile> {
        sqlx::query("INSERT INTO profiles (id, username) VALUES ($1, $2)")
            .bind(profile.id)
            .bind(&profile.username)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(profile)
    }
}

#[async_trait]
impl PostImageStore for PostgresGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_id, image_url, created_at FROM post_images
             WHERE post_id = $1 ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows.iter().map(map_image).collect())
    }

    async fn insert(&self, new_image: NewPostImage) -> Result<PostImage> {
        let row = sqlx::query(
            r#"
            INSERT INTO post_images (id, post_id, image_url, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, post_id, image_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_image.post_id)
        .bind(new_image.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;
        Ok(map_image(&row))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM post_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}

#[async_trait]
impl CommentStore for PostgresGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_id, user_id, content, created_at FROM comments
             WHERE post_id = $1 ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows.iter().map(map_comment).collect())
    }

    async fn insert(&self, new_comment: NewComment) -> Result<Comment> {
        let row = sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_comment.post_id)
        .bind(new_comment.user_id)
        .bind(new_comment.content)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;
        Ok(map_comment(&row))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}

#[async_trait]
impl LikeStore for PostgresGateway {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Like>> {
        let rows = sqlx::query(
            r#"
            SELECT post_id, user_id, created_at FROM likes
             WHERE post_id = $1 ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows.iter().map(map_like).collect())
    }

    /// The unique (post_id, user_id) index makes a duplicate insert a
    /// no-op; the stored row is returned either way.
    async fn insert(&self, post_id: Uuid, account_id: Uuid) -> Result<Like> {
        sqlx::query(
            r#"
            INSERT INTO likes (post_id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(internal)?;

        let row = sqlx::query(
            "SELECT post_id, user_id, created_at FROM likes WHERE post_id = $1 AND user_id = $2",
        )
        .bind(post_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)?;
        Ok(map_like(&row))
    }

    async fn delete(&self, post_id: Uuid, account_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PostgresGateway {
    async fn insert(&self, new_account: NewAccount) -> Result<AccountCredential> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_account.email)
        .bind(new_account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                GatewayError::Conflict("email already registered".to_string())
            }
            _ => internal(err),
        })?;
        Ok(map_credential(&row))
    }

    async fn find_by_email(&self, email: String) -> Result<Option<AccountCredential>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        Ok(row.as_ref().map(map_credential))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, email, created_at FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|row| Account {
            id: row.get("id"),
            email: row.get("email"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        }))
    }
}

fn map_credential(row: &PgRow) -> AccountCredential {
    AccountCredential {
        account: Account {
            id: row.get("id"),
            email: row.get("email"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        },
        password_hash: row.get("password_hash"),
    }
}
