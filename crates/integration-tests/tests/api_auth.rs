//! Sign-up, sign-in and sign-out over HTTP.

use axum::http::{header, StatusCode};
use domains::AccountStore;
use integration_tests::{body_string, TestApp, COOKIE_NAME};

#[tokio::test]
async fn signup_creates_the_account_and_shows_the_done_screen() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/signup",
            None,
            &[
                ("username", "다꾸장인"),
                ("email", "dak@example.com"),
                ("password", "secret1"),
                ("password_confirm", "secret1"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("회원가입 완료!"));
    assert!(body.contains("이메일 인증 후 로그인해 주세요"));

    let stored = app
        .gateway
        .find_by_email("dak@example.com".to_string())
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn mismatched_passwords_never_reach_the_gateway() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/signup",
            None,
            &[
                ("username", "다꾸장인"),
                ("email", "dak@example.com"),
                ("password", "secret1"),
                ("password_confirm", "secret2"),
            ],
        )
        .await;
    let body = body_string(response).await;
    assert!(body.contains("비밀번호가 일치하지 않습니다."));

    let stored = app
        .gateway
        .find_by_email("dak@example.com".to_string())
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn short_passwords_are_rejected_inline() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/signup",
            None,
            &[
                ("username", "다꾸장인"),
                ("email", "dak@example.com"),
                ("password", "12345"),
                ("password_confirm", "12345"),
            ],
        )
        .await;
    let body = body_string(response).await;
    assert!(body.contains("비밀번호는 6자 이상이어야 합니다."));
}

#[tokio::test]
async fn duplicate_email_gets_the_generic_failure() {
    let app = TestApp::new();
    app.seed_user("dak@example.com", "다꾸장인").await;

    let response = app
        .post_form(
            "/signup",
            None,
            &[
                ("username", "딴사람"),
                ("email", "dak@example.com"),
                ("password", "secret2"),
                ("password_confirm", "secret2"),
            ],
        )
        .await;
    let body = body_string(response).await;
    assert!(body.contains("회원가입에 실패했습니다."));
}

#[tokio::test]
async fn login_sets_the_session_cookie_and_the_navbar_greets() {
    let app = TestApp::new();
    app.seed_user("dak@example.com", "다꾸장인").await;

    let response = app
        .post_form(
            "/login",
            None,
            &[("email", "dak@example.com"), ("password", "secret1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie issued");
    assert!(set_cookie.starts_with(COOKIE_NAME));
    let token = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split('=').nth(1))
        .expect("token value");

    let body = body_string(app.get("/", Some(token)).await).await;
    assert!(body.contains("다꾸장인"));
    assert!(body.contains("로그아웃"));
}

#[tokio::test]
async fn wrong_credentials_render_the_generic_message() {
    let app = TestApp::new();
    app.seed_user("dak@example.com", "다꾸장인").await;

    let response = app
        .post_form(
            "/login",
            None,
            &[("email", "dak@example.com"), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("이메일 또는 비밀번호가 올바르지 않습니다."));
}

#[tokio::test]
async fn logout_clears_the_cookie_and_redirects_home() {
    let app = TestApp::new();
    let (_, token) = app.seed_user("dak@example.com", "다꾸장인").await;

    let response = app.post_form("/logout", Some(&token), &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("removal cookie");
    assert!(set_cookie.starts_with(COOKIE_NAME));
    assert!(set_cookie.contains("Max-Age=0") || set_cookie.contains("Expires"));
}
