pub mod api;
pub mod leaderboard;
