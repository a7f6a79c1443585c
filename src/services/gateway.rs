use axum::http::{
    header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE},
    StatusCode,
};
use color_eyre::Result;
use serde_json::{json, Value};

use crate::names;

// ---------------------------------------------------------------------------
// LeaderboardSource trait (the upstream scoring API)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait LeaderboardSource: Send + Sync {
    /// Fetch one page of ranked results as raw JSON.
    fn fetch_page(
        &self,
        page: u32,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

#[derive(Clone)]
pub struct HttpLeaderboardSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLeaderboardSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl LeaderboardSource for HttpLeaderboardSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Value> {
        let url = names::upstream_page_url(&self.base_url, page, limit);

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            tracing::error!("scoring API responded with status: {status}");
            color_eyre::eyre::bail!("scoring API responded with status: {status}");
        }

        Ok(resp.json::<Value>().await?)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// What the gateway hands back to its caller: either the upstream body as-is,
/// or the uniform failure envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
    Relayed(Value),
    Failed,
}

impl GatewayReply {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayReply::Relayed(_) => StatusCode::OK,
            GatewayReply::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_body(self) -> Value {
        match self {
            GatewayReply::Relayed(body) => body,
            GatewayReply::Failed => json!({
                "success": false,
                "error": names::GATEWAY_ERROR_MESSAGE,
            }),
        }
    }
}

pub struct Gateway<S: LeaderboardSource = HttpLeaderboardSource> {
    source: S,
}

impl<S: LeaderboardSource + Clone> Clone for Gateway<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<S: LeaderboardSource> Gateway<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Forward one page request upstream. Never fails: every upstream error
    /// becomes [`GatewayReply::Failed`].
    pub async fn fetch(&self, page: u32, limit: u32) -> GatewayReply {
        tracing::info!("fetching leaderboard data - page: {page}, limit: {limit}");

        match self.source.fetch_page(page, limit).await {
            Ok(body) => {
                let success = body.get("success").and_then(Value::as_bool) == Some(true);
                tracing::info!(
                    "scoring API response received: {}",
                    if success { "Success" } else { "Failed" }
                );
                GatewayReply::Relayed(body)
            }
            Err(e) => {
                tracing::error!("error fetching leaderboard data: {e}");
                GatewayReply::Failed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
