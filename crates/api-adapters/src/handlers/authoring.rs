//! The composer: create and edit, with multipart image intake.

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use services::{CurrentUser, PostComposer, ServiceError};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::render;
use crate::session::session_from;
use crate::state::AppState;
use crate::templates::{page_user, EditorTemplate, ExistingImage};

struct ComposerInput {
    title: String,
    content: String,
    files: Vec<(String, mime::Mime, Bytes)>,
}

/// Pulls title/content and the selected files out of the multipart body.
/// Browsers submit an empty file part when nothing is selected; those are
/// dropped here.
async fn read_input(mut multipart: Multipart) -> Result<ComposerInput, ApiError> {
    let mut input = ComposerInput {
        title: String::new(),
        content: String::new(),
        files: Vec::new(),
    };
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => input.title = field.text().await?,
            Some("content") => input.content = field.text().await?,
            Some("images") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let content_type = field
                    .content_type()
                    .and_then(|ct| ct.parse::<mime::Mime>().ok())
                    .unwrap_or_else(|| mime_guess::from_path(&file_name).first_or_octet_stream());
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    input.files.push((file_name, content_type, bytes));
                }
            }
            _ => {}
        }
    }
    Ok(input)
}

fn compose_template(
    user: &Option<CurrentUser>,
    composer: &PostComposer,
    edit_post_id: Option<Uuid>,
    error: Option<String>,
) -> EditorTemplate {
    let editing = edit_post_id.is_some();
    EditorTemplate {
        user: page_user(user),
        heading: if editing { "게시물 수정" } else { "새 글 작성" }.to_string(),
        action: match edit_post_id {
            Some(id) => format!("/posts/{id}/edit"),
            None => "/write".to_string(),
        },
        title: composer.title.clone(),
        content: composer.content.clone(),
        existing: composer
            .existing_images()
            .iter()
            .map(|image| ExistingImage {
                id: image.id,
                url: image.image_url.clone(),
            })
            .collect(),
        edit_post_id,
        error,
        submit_label: if editing { "수정 완료" } else { "게시하기" }.to_string(),
    }
}

fn new_composer(state: &AppState) -> PostComposer {
    PostComposer::compose(
        state.posts.clone(),
        state.images.clone(),
        state.media.clone(),
    )
}

async fn edit_composer(
    state: &AppState,
    post_id: Uuid,
    viewer: Uuid,
) -> Result<PostComposer, ServiceError> {
    PostComposer::edit(
        state.posts.clone(),
        state.images.clone(),
        state.media.clone(),
        post_id,
        viewer,
    )
    .await
}

pub async fn write_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let user = session.current();
    if user.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let composer = new_composer(&state);
    render(compose_template(&user, &composer, None, None))
}

pub async fn write_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let input = read_input(multipart).await?;
    let mut composer = new_composer(&state);
    composer.title = input.title;
    composer.content = input.content;
    for (file_name, content_type, bytes) in input.files {
        composer.stage(file_name, content_type, bytes);
    }

    submit_and_respond(composer, None, user).await
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    // A missing post or foreign owner bounces home before anything renders.
    let composer = match edit_composer(&state, id, user.id).await {
        Ok(composer) => composer,
        Err(_) => return Ok(Redirect::to("/").into_response()),
    };
    render(compose_template(&Some(user), &composer, Some(id), None))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut composer = match edit_composer(&state, id, user.id).await {
        Ok(composer) => composer,
        Err(_) => return Ok(Redirect::to("/").into_response()),
    };
    let input = read_input(multipart).await?;
    composer.title = input.title;
    composer.content = input.content;
    for (file_name, content_type, bytes) in input.files {
        composer.stage(file_name, content_type, bytes);
    }

    submit_and_respond(composer, Some(id), user).await
}

/// Runs the submit protocol and renders either the detail redirect or the
/// form with the inline failure and the input preserved.
async fn submit_and_respond(
    mut composer: PostComposer,
    edit_post_id: Option<Uuid>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    match composer.submit(user.id).await {
        Ok(post_id) => Ok(Redirect::to(&format!("/posts/{post_id}")).into_response()),
        Err(err) => {
            let message = match err {
                ServiceError::Validation(message) => message,
                other => {
                    tracing::warn!(error = %other, "post save failed");
                    "게시물 저장에 실패했습니다. 다시 시도해 주세요.".to_string()
                }
            };
            render(compose_template(
                &Some(user),
                &composer,
                edit_post_id,
                Some(message),
            ))
        }
    }
}

pub async fn delete_image(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let Some(user) = session.current() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut composer = match edit_composer(&state, id, user.id).await {
        Ok(composer) => composer,
        Err(_) => return Ok(Redirect::to("/").into_response()),
    };
    composer.remove_existing_image(image_id).await?;
    Ok(Redirect::to(&format!("/posts/{id}/edit")).into_response())
}
