pub mod components;
pub mod layout;
pub mod leaderboard;

// Re-export commonly used functions from layout
pub use layout::{page, render, titled};
