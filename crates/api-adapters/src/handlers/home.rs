//! The home feed.

use axum::extract::State;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use services::HomeFeed;

use crate::error::ApiError;
use crate::handlers::render;
use crate::session::session_from;
use crate::state::AppState;
use crate::templates::{page_user, FeedCard, HomeTemplate};

pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let session = session_from(&state, &jar).await;

    let mut feed = HomeFeed::new(state.posts.clone());
    feed.load().await;
    let cards = feed
        .state()
        .loaded()
        .map(|summaries| summaries.iter().map(FeedCard::from_summary).collect())
        .unwrap_or_default();

    render(HomeTemplate {
        user: page_user(&session.current()),
        cards,
    })
}
