use crate::{
    names,
    services::{
        gateway::{Gateway, GatewayReply, HttpLeaderboardSource, LeaderboardSource},
        view_model::{self, FilterCriteria, LeaderboardSettings, SortSpec},
        view_state::{FetchTag, Slot, Update, ViewState},
    },
};

/// Builds the leaderboard view for one page by pulling through the gateway.
pub struct LeaderboardService<S: LeaderboardSource = HttpLeaderboardSource> {
    gateway: Gateway<S>,
    settings: LeaderboardSettings,
}

impl<S: LeaderboardSource + Clone> Clone for LeaderboardService<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S: LeaderboardSource> LeaderboardService<S> {
    pub fn new(gateway: Gateway<S>, settings: LeaderboardSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    pub fn settings(&self) -> &LeaderboardSettings {
        &self.settings
    }

    /// Fetch one slot's data and turn the reply into a state update.
    async fn fetch(&self, tag: FetchTag) -> Update {
        match self.gateway.fetch(tag.source_page(), names::PAGE_SIZE).await {
            GatewayReply::Relayed(body) => Update::Fetched {
                tag,
                outcome: view_model::parse_page(&body),
            },
            GatewayReply::Failed => Update::FetchFailed { tag },
        }
    }

    /// Load `page` with the given filter and sort.
    ///
    /// Off page 1 the podium cards come from a page-1 fetch issued alongside
    /// the primary one; the pinned row is fetched from page 1 only when the
    /// primary page turns out not to contain it.
    pub async fn load(&self, page: u32, criteria: FilterCriteria, sort: SortSpec) -> ViewState {
        let mut state = ViewState::new(self.settings.clone())
            .reduce(Update::PageRequested(page))
            .reduce(Update::FilterChanged(criteria))
            .reduce(Update::SortChanged(sort));

        let primary = self.fetch(FetchTag::new(page, Slot::Primary));

        if page == 1 {
            state = state.reduce(primary.await);
        } else {
            let (primary, highlights) =
                tokio::join!(primary, self.fetch(FetchTag::new(page, Slot::Highlights)));
            state = state.reduce(primary).reduce(highlights);

            if state.needs_highlighted_user() {
                let user = self
                    .fetch(FetchTag::new(page, Slot::HighlightedUser))
                    .await;
                state = state.reduce(user);
            }
        }

        state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockall::predicate::eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::services::{gateway::MockLeaderboardSource, view_state::Status};

    fn body(ranks: std::ops::RangeInclusive<u32>) -> Value {
        let results: Vec<Value> = ranks
            .map(|rank| {
                json!({
                    "rank": rank,
                    "userId": { "_id": format!("u{rank}"), "name": format!("Student {rank}"), "profilePicture": "" },
                    "totalMarkScored": 300.0 - f64::from(rank) * 2.0,
                    "accuracy": 90.0,
                    "subjects": [
                        { "subjectId": { "_id": "p", "title": "Physics" }, "totalMarkScored": 97.6, "accuracy": 90.0 }
                    ]
                })
            })
            .collect();
        json!({ "success": true, "data": { "results": results, "totalCount": 30 } })
    }

    fn service(mock: MockLeaderboardSource) -> LeaderboardService<MockLeaderboardSource> {
        LeaderboardService::new(Gateway::new(mock), LeaderboardSettings::default())
    }

    #[tokio::test]
    async fn page_one_uses_a_single_fetch() {
        let mut mock = MockLeaderboardSource::new();
        mock.expect_fetch_page()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(body(1..=10)) }));

        let state = service(mock)
            .load(1, FilterCriteria::default(), SortSpec::default())
            .await;

        assert_eq!(state.status, Status::Loaded);
        assert_eq!(state.total_pages, 3);
        let highlights: Vec<u32> = state.highlight_entries.iter().map(|h| h.rank).collect();
        assert_eq!(highlights, [1, 2, 3, 8]);
        assert_eq!(state.highlight_entries[0].subject_score("physics"), 98);
        assert_eq!(state.highlighted_user_row.unwrap().rank, 8);
    }

    #[tokio::test]
    async fn later_pages_pull_highlights_and_pinned_row_from_page_one() {
        let mut mock = MockLeaderboardSource::new();
        mock.expect_fetch_page()
            .with(eq(2), eq(10))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(body(11..=20)) }));
        mock.expect_fetch_page()
            .with(eq(1), eq(10))
            .times(2)
            .returning(|_, _| Box::pin(async { Ok(body(1..=10)) }));

        let state = service(mock)
            .load(2, FilterCriteria::default(), SortSpec::default())
            .await;

        let rows: Vec<u32> = state.primary_rows.iter().map(|r| r.rank).collect();
        assert_eq!(rows, (11..=20).collect::<Vec<_>>());
        let highlights: Vec<u32> = state.highlight_entries.iter().map(|h| h.rank).collect();
        assert_eq!(highlights, [1, 2, 3, 8]);
        let pinned = state.highlighted_user_row.unwrap();
        assert_eq!(pinned.rank, 8);
        assert_eq!(pinned.name, "Student 8 (You)");
    }

    #[tokio::test]
    async fn pinned_row_on_current_page_skips_second_fetch() {
        let mut mock = MockLeaderboardSource::new();
        mock.expect_fetch_page()
            .with(eq(2), eq(10))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(body(11..=20)) }));
        mock.expect_fetch_page()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(body(1..=10)) }));

        let settings = LeaderboardSettings {
            highlighted_rank: 12,
            ..LeaderboardSettings::default()
        };
        let state = LeaderboardService::new(Gateway::new(mock), settings)
            .load(2, FilterCriteria::default(), SortSpec::default())
            .await;

        assert_eq!(state.highlighted_user_row.unwrap().rank, 12);
    }

    #[tokio::test]
    async fn malformed_primary_yields_empty_projections() {
        let mut mock = MockLeaderboardSource::new();
        mock.expect_fetch_page()
            .with(eq(2), eq(10))
            .returning(|_, _| Box::pin(async { Ok(json!({ "success": true, "data": {} })) }));
        mock.expect_fetch_page()
            .with(eq(1), eq(10))
            .returning(|_, _| Box::pin(async { Ok(body(1..=10)) }));

        let state = service(mock)
            .load(2, FilterCriteria::default(), SortSpec::default())
            .await;

        assert_eq!(state.status, Status::NoData);
        assert!(state.highlight_entries.is_empty());
        assert!(state.primary_rows.is_empty());
        assert!(state.highlighted_user_row.is_none());
    }

    #[tokio::test]
    async fn upstream_failure_is_reported_not_raised() {
        let mut mock = MockLeaderboardSource::new();
        mock.expect_fetch_page().returning(|_, _| {
            Box::pin(async { Err(color_eyre::eyre::eyre!("timed out")) })
        });

        let state = service(mock)
            .load(1, FilterCriteria::default(), SortSpec::default())
            .await;

        assert!(matches!(state.status, Status::Failed(_)));
        assert!(state.projection().is_empty());
    }
}
