use axum::{
    extract::{Query, State},
    http::header::CACHE_CONTROL,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{names, rejections::AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::LEADERBOARD_API_URL, get(leaderboard))
}

#[derive(Deserialize)]
struct LeaderboardApiQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardApiQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(names::DEFAULT_API_PAGE);
    let limit = query.limit.unwrap_or(names::DEFAULT_API_LIMIT);

    if page == 0 || limit == 0 {
        return Err(AppError::Input("page and limit must be positive"));
    }

    let reply = state.leaderboard.gateway().fetch(page, limit).await;

    Ok((
        reply.status(),
        [(CACHE_CONTROL, "no-store")],
        Json(reply.into_body()),
    ))
}
