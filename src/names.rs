use crate::services::view_model::{FilterCriteria, SortSpec};

pub const LEADERBOARD_URL: &str = "/";
pub const LEADERBOARD_API_URL: &str = "/api/leaderboard";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.quizrr.in/api/hiring";
pub const UPSTREAM_LEADERBOARD_PATH: &str = "/leaderboard";

// Gateway defaults when the caller omits the query parameters
pub const DEFAULT_API_PAGE: u32 = 1;
pub const DEFAULT_API_LIMIT: u32 = 100;
pub const GATEWAY_ERROR_MESSAGE: &str = "Failed to fetch leaderboard data";

// Page layout
pub const PAGE_SIZE: u32 = 10;
pub const DEFAULT_TOTAL_COUNT: u64 = 100;
pub const PODIUM_SIZE: usize = 3;
pub const MAX_VISIBLE_PAGE_LINKS: u32 = 5;
pub const MAX_SCORE: i64 = 300;
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg";
pub const HIGHLIGHTED_USER_LABEL: &str = " (You)";

// Placeholder for the viewer's identity until sessions exist
pub const DEFAULT_HIGHLIGHTED_RANK: u32 = 8;

pub fn upstream_page_url(base: &str, page: u32, limit: u32) -> String {
    format!(
        "{}{UPSTREAM_LEADERBOARD_PATH}?page={page}&limit={limit}",
        base.trim_end_matches('/')
    )
}

/// Leaderboard page URL carrying the filter and sort, omitting defaults.
pub fn leaderboard_url(page: u32, criteria: &FilterCriteria, sort: &SortSpec) -> String {
    let mut params = vec![format!("page={page}")];

    if let Some(q) = criteria.search_text.as_deref().filter(|q| !q.is_empty()) {
        params.push(format!("q={}", urlencoding::encode(q)));
    }
    let bounds = [
        ("min_score", criteria.min_score),
        ("max_score", criteria.max_score),
        ("min_accuracy", criteria.min_accuracy),
        ("max_accuracy", criteria.max_accuracy),
    ];
    for (name, value) in bounds {
        if let Some(value) = value {
            params.push(format!("{name}={value}"));
        }
    }
    if *sort != SortSpec::default() {
        params.push(format!("sort={}", sort.field.as_param()));
        params.push(format!("order={}", sort.direction.as_param()));
    }

    format!("{LEADERBOARD_URL}?{}", params.join("&"))
}
