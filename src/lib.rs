pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod utils;
pub mod views;

use axum::Router;

use services::{
    gateway::{Gateway, HttpLeaderboardSource},
    leaderboard::LeaderboardService,
    view_model::LeaderboardSettings,
};

#[derive(Clone)]
pub struct AppState {
    pub leaderboard: LeaderboardService,
}

impl AppState {
    pub fn new(upstream_url: impl Into<String>, settings: LeaderboardSettings) -> Self {
        let gateway = Gateway::new(HttpLeaderboardSource::new(upstream_url));
        Self {
            leaderboard: LeaderboardService::new(gateway, settings),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::leaderboard::routes())
        .merge(handlers::api::routes())
        .with_state(state)
}
