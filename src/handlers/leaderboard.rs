use axum::{extract::State, routing::get, Router};
use maud::Markup;

use crate::{
    extractors::{IsHtmx, LeaderboardParams},
    names, views,
    views::leaderboard as leaderboard_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::LEADERBOARD_URL, get(leaderboard_page))
}

async fn leaderboard_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    LeaderboardParams {
        page,
        criteria,
        sort,
    }: LeaderboardParams,
) -> Markup {
    let view = state.leaderboard.load(page, criteria, sort).await;

    views::render(is_htmx, "Leaderboard", leaderboard_views::leaderboard(&view))
}
