//! Cookie-to-session plumbing. Each request resolves its own
//! `SessionContext` from the session cookie; nothing identity-related is
//! process-global.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use services::SessionContext;

use crate::state::AppState;

/// Resolves the request's session context from the cookie, if any.
pub async fn session_from(state: &AppState, jar: &CookieJar) -> SessionContext {
    let token = jar
        .get(&state.cookie_name)
        .map(|cookie| cookie.value().to_string());
    SessionContext::resolve(state.auth.clone(), state.profiles.clone(), token).await
}

pub fn session_token(state: &AppState, jar: &CookieJar) -> Option<String> {
    jar.get(&state.cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Issues the session cookie. HttpOnly + Lax: the token never needs to be
/// script-readable and every mutation here is a same-site form post.
pub fn store_session(state: &AppState, jar: CookieJar, token: String) -> CookieJar {
    let mut cookie = Cookie::new(state.cookie_name.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    jar.add(cookie)
}

pub fn clear_session(state: &AppState, jar: CookieJar) -> CookieJar {
    let cookie = Cookie::build((state.cookie_name.clone(), ""))
        .path("/")
        .build();
    jar.remove(cookie)
}
