#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing,
    Json, Router,
};
use http_body_util::BodyExt;
use leaderboard::{router, services::view_model::LeaderboardSettings, AppState};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;

pub type Requests = Arc<Mutex<Vec<(u32, u32)>>>;

/// A scoring API stand-in bound to an ephemeral port.
pub struct Upstream {
    pub base_url: String,
    /// Serves `503` for every request.
    pub down_url: String,
    /// Serves a body that is not JSON.
    pub garbage_url: String,
    /// Serves `{"success": false}` with `200`.
    pub empty_url: String,
    pub requests: Requests,
}

impl Upstream {
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .map(|(page, _)| *page)
            .collect()
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    limit: u32,
}

pub fn entry(rank: u32) -> Value {
    json!({
        "rank": rank,
        "userId": {
            "_id": format!("student-{rank}"),
            "name": format!("Student {rank}"),
            "profilePicture": ""
        },
        "totalMarkScored": 300.0 - f64::from(rank) * 2.5,
        "accuracy": 99.126 - f64::from(rank),
        "subjects": [
            { "subjectId": { "_id": "phy", "title": "Physics" }, "totalMarkScored": 97.6 - f64::from(rank), "accuracy": 95.0 },
            { "subjectId": { "_id": "chem", "title": "Chemistry" }, "totalMarkScored": 90.2, "accuracy": 90.0 },
            { "subjectId": { "_id": "math", "title": "Mathematics" }, "totalMarkScored": 88.0, "accuracy": 85.0 }
        ],
        "marksGained": 280,
        "marksLost": 5,
        "unansweredMarks": 15
    })
}

pub const TOTAL_COUNT: u64 = 57;

/// One page of entries; pages past the total come back with empty results.
pub fn page_body(page: u32, limit: u32) -> Value {
    let size = u64::from(limit.min(10));
    let first = u64::from(page.saturating_sub(1)) * size + 1;
    let last = (first + size - 1).min(TOTAL_COUNT);
    let results: Vec<Value> = (first..=last)
        .filter_map(|rank| u32::try_from(rank).ok())
        .map(entry)
        .collect();
    json!({ "success": true, "data": { "results": results, "totalCount": TOTAL_COUNT } })
}

async fn leaderboard(
    State(requests): State<Requests>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    requests
        .lock()
        .expect("requests lock")
        .push((query.page, query.limit));
    Json(page_body(query.page, query.limit))
}

async fn down() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn garbage() -> impl IntoResponse {
    (StatusCode::OK, "<html>not json</html>")
}

async fn empty() -> Json<Value> {
    Json(json!({ "success": false }))
}

pub async fn spawn_upstream() -> Upstream {
    let requests: Requests = Arc::default();
    let app = Router::new()
        .route("/leaderboard", routing::get(leaderboard))
        .route("/down/leaderboard", routing::get(down))
        .route("/garbage/leaderboard", routing::get(garbage))
        .route("/empty/leaderboard", routing::get(empty))
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("fake upstream address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });

    let base_url = format!("http://{addr}");
    Upstream {
        down_url: format!("{base_url}/down"),
        garbage_url: format!("{base_url}/garbage"),
        empty_url: format!("{base_url}/empty"),
        base_url,
        requests,
    }
}

pub fn app(upstream_url: &str) -> Router {
    router(AppState::new(upstream_url, LeaderboardSettings::default()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub cache_control: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response should be JSON")
    }
}

pub async fn get(app: &Router, uri: &str, is_htmx: bool) -> TestResponse {
    let mut req = Request::builder().uri(uri);
    if is_htmx {
        req = req.header("HX-Request", "true");
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::empty()).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = resp.status();
    let cache_control = resp
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    TestResponse {
        status,
        cache_control,
        body: String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"),
    }
}
