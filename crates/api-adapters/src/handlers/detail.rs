//! The post detail page and its mutations.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use services::{PostDetail, ViewState};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::render;
use crate::session::session_from;
use crate::state::AppState;
use crate::templates::{page_user, DetailTemplate, NotFoundTemplate};

#[derive(Deserialize)]
pub struct CommentInput {
    pub content: String,
}

fn orchestrator(state: &AppState) -> PostDetail {
    PostDetail::new(
        state.posts.clone(),
        state.profiles.clone(),
        state.images.clone(),
        state.comments.clone(),
        state.likes.clone(),
    )
}

pub async fn show_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let user = session.current();

    let mut detail = orchestrator(&state);
    detail.load(id, user.as_ref().map(|u| u.id)).await;
    match detail.state() {
        ViewState::Loaded(view) => render(DetailTemplate::from_view(view, &user)),
        // A gateway failure degrades to the same rendering as a missing id.
        _ => {
            let body = NotFoundTemplate {
                user: page_user(&user),
            }
            .render()?;
            Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
        }
    }
}

pub async fn toggle_like(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut detail = orchestrator(&state);
    detail.load(id, Some(user.id)).await;
    if !matches!(detail.state(), ViewState::Loaded(_)) {
        return Ok(Redirect::to("/").into_response());
    }
    detail.toggle_like(Some(user.id)).await?;
    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

pub async fn add_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    axum::Form(input): axum::Form<CommentInput>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let user = session.current();

    // Whitespace-only input is dropped before the session check, exactly
    // like the original form handler.
    if input.content.trim().is_empty() {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }
    let Some(user) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut detail = orchestrator(&state);
    detail.load(id, Some(user.id)).await;
    if !matches!(detail.state(), ViewState::Loaded(_)) {
        return Ok(Redirect::to("/").into_response());
    }
    detail.add_comment(Some(user.id), &input.content).await?;
    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

pub async fn delete_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut detail = orchestrator(&state);
    detail.load(id, Some(user.id)).await;
    if !matches!(detail.state(), ViewState::Loaded(_)) {
        return Ok(Redirect::to("/").into_response());
    }
    detail.delete_comment(Some(user.id), comment_id).await?;
    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut detail = orchestrator(&state);
    detail.load(id, Some(user.id)).await;
    match detail.state() {
        ViewState::Loaded(_) => {
            detail.delete_post(Some(user.id)).await?;
            Ok(Redirect::to("/").into_response())
        }
        _ => Ok(Redirect::to("/").into_response()),
    }
}
