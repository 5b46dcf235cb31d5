//! Route table for the whole navigable surface.

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, authoring, detail, home};
use crate::metrics;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/signup", get(auth::signup_form).post(auth::signup_submit))
        .route("/logout", post(auth::logout))
        .route("/posts/{id}", get(detail::show_post))
        .route("/posts/{id}/like", post(detail::toggle_like))
        .route("/posts/{id}/comments", post(detail::add_comment))
        .route(
            "/posts/{id}/comments/{comment_id}/delete",
            post(detail::delete_comment),
        )
        .route("/posts/{id}/delete", post(detail::delete_post))
        .route(
            "/write",
            get(authoring::write_form).post(authoring::write_submit),
        )
        .route(
            "/posts/{id}/edit",
            get(authoring::edit_form).post(authoring::edit_submit),
        )
        .route(
            "/posts/{id}/images/{image_id}/delete",
            post(authoring::delete_image),
        )
        .route("/metrics", get(metrics::exposition))
        .layer(middleware::from_fn_with_state(state.clone(), metrics::track))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
