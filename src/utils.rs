pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Round half up, so `97.5` becomes `98` and `-2.5` becomes `-2`.
pub fn round_score(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to two decimal places.
pub fn round_accuracy(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ordinal_suffix(rank: u32) -> &'static str {
    match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
