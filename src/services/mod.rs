pub mod gateway;
pub mod leaderboard;
pub mod view_model;
pub mod view_state;
