//! Sign-in, sign-up and sign-out.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use services::{ServiceError, SignUpForm};

use crate::error::ApiError;
use crate::handlers::render;
use crate::session::{clear_session, session_from, session_token, store_session};
use crate::state::AppState;
use crate::templates::{page_user, LoginTemplate, SignupDoneTemplate, SignupTemplate};

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    render(LoginTemplate {
        user: page_user(&session.current()),
        email: String::new(),
        error: None,
    })
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Form(input): axum::Form<LoginInput>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    match session.sign_in(&input.email, &input.password).await {
        Ok(issued) => {
            let jar = store_session(&state, jar, issued.token);
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(err) => {
            // Wrong credentials and unknown accounts get the same message.
            tracing::debug!(error = %err, "sign-in rejected");
            render(LoginTemplate {
                user: None,
                email: input.email,
                error: Some("이메일 또는 비밀번호가 올바르지 않습니다.".to_string()),
            })
        }
    }
}

pub async fn signup_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    render(SignupTemplate {
        user: page_user(&session.current()),
        username: String::new(),
        email: String::new(),
        error: None,
    })
}

pub async fn signup_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Form(input): axum::Form<SignupInput>,
) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;
    let outcome = session
        .sign_up(SignUpForm {
            username: input.username.clone(),
            email: input.email.clone(),
            password: input.password,
            password_confirm: input.password_confirm,
        })
        .await;

    match outcome {
        Ok(_) => render(SignupDoneTemplate { user: None }),
        Err(err) => {
            let message = match err {
                ServiceError::Validation(message) => message,
                other => {
                    tracing::debug!(error = %other, "sign-up rejected");
                    "회원가입에 실패했습니다.".to_string()
                }
            };
            render(SignupTemplate {
                user: None,
                username: input.username,
                email: input.email,
                error: Some(message),
            })
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = session_from(&state, &jar).await;
    session.sign_out(session_token(&state, &jar)).await;
    let jar = clear_session(&state, jar);
    (jar, Redirect::to("/")).into_response()
}
