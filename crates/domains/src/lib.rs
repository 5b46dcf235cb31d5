//! hobbylog/crates/domains/src/lib.rs
//!
//! The central domain models and gateway interface definitions for hobbylog.

pub mod error;
pub mod models;
pub mod ports;
pub mod views;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
pub use views::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_post_creation() {
        let id = Uuid::new_v4();
        let post = Post {
            id,
            user_id: Uuid::new_v4(),
            title: "오늘의 다꾸".to_string(),
            content: "스티커를 새로 샀다".to_string(),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(post.id, id);
        assert!(!post.title.is_empty());
    }

    #[test]
    fn test_like_identity_is_pair() {
        let post_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let like = Like {
            post_id,
            user_id,
            created_at: chrono::Utc::now(),
        };
        assert_eq!((like.post_id, like.user_id), (post_id, user_id));
    }
}
