//! Detail view rendering and its mutations.

use axum::http::StatusCode;
use domains::{CommentStore, LikeStore};
use integration_tests::{assert_redirect, body_string, TestApp};
use uuid::Uuid;

#[tokio::test]
async fn unknown_post_renders_not_found() {
    let app = TestApp::new();
    let response = app.get(&format!("/posts/{}", Uuid::new_v4()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("게시물을 찾을 수 없어요."));
}

#[tokio::test]
async fn detail_renders_post_author_images_and_comments() {
    let app = TestApp::new();
    let (author, _) = app.seed_user("dak@example.com", "다꾸장인").await;
    let (commenter, _) = app.seed_user("friend@example.com", "댓글러").await;
    let post = app
        .seed_post(author, "오늘의 다꾸", "첫 줄\n둘째 줄")
        .await;
    app.seed_image(post.id, "/static/uploads/a/b/1.png").await;
    app.seed_comment(post.id, commenter, "잘 봤어요").await;

    let body = body_string(app.get(&format!("/posts/{}", post.id), None).await).await;
    assert!(body.contains("오늘의 다꾸"));
    assert!(body.contains("다꾸장인"));
    assert!(body.contains("첫 줄"));
    assert!(body.contains("둘째 줄"));
    assert!(body.contains("/static/uploads/a/b/1.png"));
    assert!(body.contains("잘 봤어요"));
    assert!(body.contains("댓글러"));
    assert!(body.contains("댓글 1개"));
}

#[tokio::test]
async fn owner_controls_only_show_for_the_owner() {
    let app = TestApp::new();
    let (author, owner_token) = app.seed_user("dak@example.com", "다꾸장인").await;
    let (_, other_token) = app.seed_user("friend@example.com", "댓글러").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;
    let path = format!("/posts/{}", post.id);

    let owner_body = body_string(app.get(&path, Some(&owner_token)).await).await;
    assert!(owner_body.contains("수정"));
    assert!(owner_body.contains("정말 게시물을 삭제할까요?"));

    let other_body = body_string(app.get(&path, Some(&other_token)).await).await;
    assert!(!other_body.contains("정말 게시물을 삭제할까요?"));
}

#[tokio::test]
async fn anonymous_like_redirects_to_login() {
    let app = TestApp::new();
    let (author, _) = app.seed_user("dak@example.com", "다꾸장인").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;

    let response = app
        .post_form(&format!("/posts/{}/like", post.id), None, &[])
        .await;
    assert_redirect(&response, "/login");
    assert!(LikeStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn like_toggles_on_and_off() {
    let app = TestApp::new();
    let (author, _) = app.seed_user("dak@example.com", "다꾸장인").await;
    let (_, token) = app.seed_user("friend@example.com", "댓글러").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;
    let like_path = format!("/posts/{}/like", post.id);

    let response = app.post_form(&like_path, Some(&token), &[]).await;
    assert_redirect(&response, &format!("/posts/{}", post.id));
    assert_eq!(
        LikeStore::list_for_post(app.gateway.as_ref(), post.id)
            .await
            .unwrap()
            .len(),
        1
    );

    app.post_form(&like_path, Some(&token), &[]).await;
    assert!(LikeStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn whitespace_comments_insert_nothing() {
    let app = TestApp::new();
    let (author, token) = app.seed_user("dak@example.com", "다꾸장인").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;

    let response = app
        .post_form(
            &format!("/posts/{}/comments", post.id),
            Some(&token),
            &[("content", "   ")],
        )
        .await;
    assert_redirect(&response, &format!("/posts/{}", post.id));
    assert!(CommentStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn comments_append_trimmed_and_render() {
    let app = TestApp::new();
    let (author, token) = app.seed_user("dak@example.com", "다꾸장인").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;

    app.post_form(
        &format!("/posts/{}/comments", post.id),
        Some(&token),
        &[("content", "  예쁘네요  ")],
    )
    .await;

    let stored = CommentStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "예쁘네요");

    let body = body_string(app.get(&format!("/posts/{}", post.id), None).await).await;
    assert!(body.contains("예쁘네요"));
}

#[tokio::test]
async fn deleting_a_comment_removes_only_that_comment() {
    let app = TestApp::new();
    let (author, token) = app.seed_user("dak@example.com", "다꾸장인").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;
    let first = app.seed_comment(post.id, author, "첫 댓글").await;
    let second = app.seed_comment(post.id, author, "둘째 댓글").await;

    let response = app
        .post_form(
            &format!("/posts/{}/comments/{}/delete", post.id, first),
            Some(&token),
            &[],
        )
        .await;
    assert_redirect(&response, &format!("/posts/{}", post.id));

    let remaining = CommentStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);
}

#[tokio::test]
async fn strangers_cannot_delete_someone_elses_comment() {
    let app = TestApp::new();
    let (author, _) = app.seed_user("dak@example.com", "다꾸장인").await;
    let (_, stranger_token) = app.seed_user("friend@example.com", "댓글러").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;
    let comment = app.seed_comment(post.id, author, "내 댓글").await;

    let response = app
        .post_form(
            &format!("/posts/{}/comments/{}/delete", post.id, comment),
            Some(&stranger_token),
            &[],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        CommentStore::list_for_post(app.gateway.as_ref(), post.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn owner_delete_removes_the_post_and_its_children() {
    let app = TestApp::new();
    let (author, token) = app.seed_user("dak@example.com", "다꾸장인").await;
    let post = app.seed_post(author, "오늘의 다꾸", "본문").await;
    app.seed_comment(post.id, author, "댓글").await;
    app.seed_like(post.id, author).await;

    let response = app
        .post_form(&format!("/posts/{}/delete", post.id), Some(&token), &[])
        .await;
    assert_redirect(&response, "/");

    use domains::PostStore;
    assert!(PostStore::get(app.gateway.as_ref(), post.id)
        .await
        .unwrap()
        .is_none());
    assert!(CommentStore::list_for_post(app.gateway.as_ref(), post.id)
        .await
        .unwrap()
        .is_empty());
}
