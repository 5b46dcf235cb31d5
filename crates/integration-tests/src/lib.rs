//! hobbylog/crates/integration-tests/src/lib.rs
//!
//! Shared fixtures: an assembled application over the in-memory adapters
//! plus request helpers for driving it through the router.

#![cfg(feature = "web-axum")]

use std::sync::Arc;

use api_adapters::metrics::Metrics;
use api_adapters::{build_router, AppState};
use auth_adapters::{JwtSessionGateway, JwtTokenCodec};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use bytes::Bytes;
use domains::{LikeStore, NewComment, NewPost, NewPostImage, Post, SessionGateway};
use http_body_util::BodyExt;
use secrecy::SecretString;
use storage_adapters::{MemoryGateway, MemoryMediaStorage};
use tower::ServiceExt;
use uuid::Uuid;

pub const COOKIE_NAME: &str = "hobbylog_session";

/// A tiny valid-enough PNG: `image::guess_format` only needs the magic.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
pub const NOT_AN_IMAGE: &[u8] = b"plain text pretending to be a photo";

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<MemoryGateway>,
    pub media: Arc<MemoryMediaStorage>,
    pub auth: Arc<JwtSessionGateway>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let gateway = Arc::new(MemoryGateway::new());
        let media = Arc::new(MemoryMediaStorage::default());
        let auth = Arc::new(JwtSessionGateway::new(
            gateway.clone(),
            gateway.clone(),
            JwtTokenCodec::new(&SecretString::from("integration-test-secret"), 24),
        ));

        let state = AppState {
            posts: gateway.clone(),
            profiles: gateway.clone(),
            images: gateway.clone(),
            comments: gateway.clone(),
            likes: gateway.clone(),
            media: media.clone(),
            auth: auth.clone(),
            cookie_name: COOKIE_NAME.to_string(),
            metrics: Arc::new(Metrics::new()),
        };
        Self {
            router: build_router(state),
            gateway,
            media,
            auth,
        }
    }

    /// Registers an account + profile and returns (account id, session
    /// token) ready for a cookie.
    pub async fn seed_user(&self, email: &str, username: &str) -> (Uuid, String) {
        self.auth
            .sign_up(
                email.to_string(),
                "secret1".to_string(),
                username.to_string(),
            )
            .await
            .expect("sign-up fixture");
        let session = self
            .auth
            .sign_in(email.to_string(), "secret1".to_string())
            .await
            .expect("sign-in fixture");
        (session.identity.account_id, session.token)
    }

    pub async fn seed_post(&self, author: Uuid, title: &str, content: &str) -> Post {
        use domains::PostStore;
        PostStore::insert(
            self.gateway.as_ref(),
            NewPost {
                user_id: author,
                title: title.to_string(),
                content: content.to_string(),
            },
        )
        .await
        .expect("post fixture")
    }

    pub async fn seed_image(&self, post_id: Uuid, url: &str) {
        use domains::PostImageStore;
        PostImageStore::insert(
            self.gateway.as_ref(),
            NewPostImage {
                post_id,
                image_url: url.to_string(),
            },
        )
        .await
        .expect("image fixture");
    }

    pub async fn seed_comment(&self, post_id: Uuid, author: Uuid, content: &str) -> Uuid {
        use domains::CommentStore;
        CommentStore::insert(
            self.gateway.as_ref(),
            NewComment {
                post_id,
                user_id: author,
                content: content.to_string(),
            },
        )
        .await
        .expect("comment fixture")
        .id
    }

    pub async fn seed_like(&self, post_id: Uuid, account_id: Uuid) {
        LikeStore::insert(self.gateway.as_ref(), post_id, account_id)
            .await
            .expect("like fixture");
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{COOKIE_NAME}={token}"));
        }
        self.request(builder.body(Body::empty()).expect("request")).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).expect("form encoding");
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{COOKIE_NAME}={token}"));
        }
        self.request(builder.body(Body::from(body)).expect("request")).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        token: Option<&str>,
        title: &str,
        content: &str,
        files: &[(&str, &str, &[u8])],
    ) -> Response<Body> {
        const BOUNDARY: &str = "hobbylog-test-boundary";
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in [("title", title), ("content", content)] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (file_name, content_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{COOKIE_NAME}={token}"));
        }
        self.request(builder.body(Body::from(body)).expect("request")).await
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location_of(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn assert_redirect(response: &Response<Body>, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(response).as_deref(), Some(to));
}

/// Staged bytes are static in tests; mirror of the composer's extension
/// handling for building expectations.
pub fn png() -> Bytes {
    Bytes::from_static(PNG_BYTES)
}
