//! Shape checks on the domain and view models.

use chrono::Utc;
use domains::{Comment, CommentView, Like, Post, PostDetailView, PostSummary};
use uuid::Uuid;

fn post(user_id: Uuid) -> Post {
    Post {
        id: Uuid::new_v4(),
        user_id,
        title: "오늘의 다꾸".to_string(),
        content: "본문".to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn detail_view_counts_follow_its_lists() {
    let author = Uuid::new_v4();
    let p = post(author);
    let view = PostDetailView {
        author_username: Some("다꾸장인".to_string()),
        images: vec![],
        comments: vec![CommentView {
            comment: Comment {
                id: Uuid::new_v4(),
                post_id: p.id,
                user_id: author,
                content: "댓글".to_string(),
                created_at: Utc::now(),
            },
            author_username: None,
        }],
        likes: vec![
            Like {
                post_id: p.id,
                user_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
            Like {
                post_id: p.id,
                user_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
        ],
        liked: false,
        post: p,
    };
    assert_eq!(view.like_count(), 2);
    assert_eq!(view.comment_count(), 1);
}

#[test]
fn summaries_serialize_for_logging() {
    let summary = PostSummary {
        id: Uuid::new_v4(),
        title: "오늘의 다꾸".to_string(),
        content: "본문".to_string(),
        created_at: Utc::now(),
        author_username: None,
        image_url: None,
        like_count: 0,
        comment_count: 0,
    };
    let json = serde_json::to_value(&summary).expect("serializable");
    assert_eq!(json["title"], "오늘의 다꾸");
    assert!(json["author_username"].is_null());
}
