//! Askama template structs. Every page shares the navbar state (`user`);
//! everything else is the page's own view data, already formatted — the
//! templates themselves only place values.

use askama::Template;
use chrono::{DateTime, Utc};
use domains::{PostDetailView, PostSummary};
use services::{feed, CurrentUser};
use uuid::Uuid;

pub const ANONYMOUS: &str = "익명";

/// Navbar identity.
pub struct PageUser {
    pub name: String,
}

pub fn page_user(user: &Option<CurrentUser>) -> Option<PageUser> {
    user.as_ref().map(|u| PageUser {
        name: u.username.clone().unwrap_or_else(|| u.email.clone()),
    })
}

/// "2026년 8월 6일 14:30" — the detail header format.
fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%Y년 %-m월 %-d일 %H:%M").to_string()
}

/// "2026. 8. 6." — the card/comment format.
fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%Y. %-m. %-d.").to_string()
}

pub struct FeedCard {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub author: String,
    pub date: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl FeedCard {
    pub fn from_summary(summary: &PostSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            preview: feed::preview(&summary.content),
            author: summary
                .author_username
                .clone()
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            date: short_date(&summary.created_at),
            image_url: summary.image_url.clone(),
            like_count: summary.like_count,
            comment_count: summary.comment_count,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<PageUser>,
    pub cards: Vec<FeedCard>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub user: Option<PageUser>,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub user: Option<PageUser>,
    pub username: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "signup_done.html")]
pub struct SignupDoneTemplate {
    pub user: Option<PageUser>,
}

pub struct CommentItem {
    pub id: Uuid,
    pub author: String,
    pub date: String,
    pub content: String,
    pub mine: bool,
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    pub user: Option<PageUser>,
    pub post_id: Uuid,
    pub title: String,
    pub author: String,
    pub date: String,
    pub paragraphs: Vec<String>,
    pub image_urls: Vec<String>,
    pub like_count: usize,
    pub comment_count: usize,
    pub liked: bool,
    pub is_owner: bool,
    pub comments: Vec<CommentItem>,
}

impl DetailTemplate {
    pub fn from_view(view: &PostDetailView, user: &Option<CurrentUser>) -> Self {
        let viewer = user.as_ref().map(|u| u.id);
        Self {
            user: page_user(user),
            post_id: view.post.id,
            title: view.post.title.clone(),
            author: view
                .author_username
                .clone()
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            date: long_date(&view.post.created_at),
            paragraphs: view.post.content.lines().map(str::to_string).collect(),
            image_urls: view.images.iter().map(|i| i.image_url.clone()).collect(),
            like_count: view.like_count(),
            comment_count: view.comment_count(),
            liked: view.liked,
            is_owner: viewer == Some(view.post.user_id),
            comments: view
                .comments
                .iter()
                .map(|c| CommentItem {
                    id: c.comment.id,
                    author: c
                        .author_username
                        .clone()
                        .unwrap_or_else(|| ANONYMOUS.to_string()),
                    date: short_date(&c.comment.created_at),
                    content: c.comment.content.clone(),
                    mine: viewer == Some(c.comment.user_id),
                })
                .collect(),
        }
    }
}

pub struct ExistingImage {
    pub id: Uuid,
    pub url: String,
}

#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub user: Option<PageUser>,
    pub heading: String,
    pub action: String,
    pub title: String,
    pub content: String,
    pub existing: Vec<ExistingImage>,
    /// Set in edit mode; drives the existing-image delete forms.
    pub edit_post_id: Option<Uuid>,
    pub error: Option<String>,
    pub submit_label: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub user: Option<PageUser>,
}
