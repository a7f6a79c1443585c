use crate::{
    names,
    services::view_model::{
        self, FilterCriteria, HighlightEntry, LeaderboardSettings, PageOutcome, SortSpec,
        TableRow,
    },
};

/// The state slot a fetch result is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Highlights,
    HighlightedUser,
}

/// Identifies an in-flight fetch: which page view it serves and which slot it
/// fills. Results whose page no longer matches the requested page are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub page: u32,
    pub slot: Slot,
}

impl FetchTag {
    pub fn new(page: u32, slot: Slot) -> Self {
        Self { page, slot }
    }

    /// Page actually requested upstream. The secondary slots always read page 1.
    pub fn source_page(&self) -> u32 {
        match self.slot {
            Slot::Primary => self.page,
            Slot::Highlights | Slot::HighlightedUser => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Loaded,
    NoData,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Update {
    PageRequested(u32),
    Fetched { tag: FetchTag, outcome: PageOutcome },
    FetchFailed { tag: FetchTag },
    FilterChanged(FilterCriteria),
    SortChanged(SortSpec),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub page: u32,
    pub status: Status,
    pub total_pages: u32,
    pub primary_rows: Vec<TableRow>,
    pub highlight_entries: Vec<HighlightEntry>,
    pub highlighted_user_row: Option<TableRow>,
    pub filter_criteria: FilterCriteria,
    pub sort_spec: SortSpec,
    settings: LeaderboardSettings,
}

impl ViewState {
    pub fn new(settings: LeaderboardSettings) -> Self {
        Self {
            page: 1,
            status: Status::Loading,
            total_pages: 1,
            primary_rows: Vec::new(),
            highlight_entries: Vec::new(),
            highlighted_user_row: None,
            filter_criteria: FilterCriteria::default(),
            sort_spec: SortSpec::default(),
            settings,
        }
    }

    pub fn settings(&self) -> &LeaderboardSettings {
        &self.settings
    }

    /// Filtered and sorted table rows, derived fresh from the slots.
    pub fn projection(&self) -> Vec<TableRow> {
        view_model::project(&self.primary_rows, &self.filter_criteria, &self.sort_spec)
    }

    /// Whether the pinned row still has to come from a page-1 fetch.
    pub fn needs_highlighted_user(&self) -> bool {
        self.page != 1 && self.status == Status::Loaded && self.highlighted_user_row.is_none()
    }

    fn primary_has_highlighted_rank(&self) -> bool {
        self.primary_rows
            .iter()
            .any(|row| row.rank == self.settings.highlighted_rank)
    }

    fn accepts_secondary(&self) -> bool {
        matches!(self.status, Status::Loading | Status::Loaded)
    }

    pub fn reduce(mut self, update: Update) -> Self {
        match update {
            Update::PageRequested(page) => {
                self.page = page;
                self.status = Status::Loading;
                self.primary_rows.clear();
                self.highlight_entries.clear();
                self.highlighted_user_row = None;
            }
            Update::FilterChanged(criteria) => self.filter_criteria = criteria,
            Update::SortChanged(sort) => self.sort_spec = sort,
            Update::Fetched { tag, .. } | Update::FetchFailed { tag } if tag.page != self.page => {
                tracing::debug!(
                    "discarding stale {:?} result for page {} (now on page {})",
                    tag.slot,
                    tag.page,
                    self.page
                );
            }
            Update::Fetched { tag, outcome } => self.apply_fetched(tag, outcome),
            Update::FetchFailed { tag } => match tag.slot {
                Slot::Primary => {
                    self.status = Status::Failed(names::GATEWAY_ERROR_MESSAGE.to_string());
                    self.primary_rows.clear();
                    self.highlight_entries.clear();
                    self.highlighted_user_row = None;
                }
                slot => tracing::error!("failed to fetch page 1 for {slot:?}"),
            },
        }
        self
    }

    fn apply_fetched(&mut self, tag: FetchTag, outcome: PageOutcome) {
        match (tag.slot, outcome) {
            (Slot::Primary, PageOutcome::NoData) => {
                tracing::warn!("scoring API returned no data for page {}", tag.page);
                self.status = Status::NoData;
                self.primary_rows.clear();
                self.highlight_entries.clear();
                self.highlighted_user_row = None;
            }
            (Slot::Primary, PageOutcome::Loaded(data)) => {
                self.status = Status::Loaded;
                self.total_pages = view_model::total_pages(data.total_count);
                self.primary_rows = view_model::table_rows(&data.results, &self.settings.subjects);

                if self.page == 1 {
                    self.highlight_entries =
                        view_model::highlight_entries(&data.results, &self.settings);
                }

                // A row on the current page beats one fetched from page 1.
                if let Some(row) = view_model::highlighted_user_row(
                    &self.primary_rows,
                    self.settings.highlighted_rank,
                ) {
                    self.highlighted_user_row = Some(row);
                } else if self.page == 1 {
                    self.highlighted_user_row = None;
                }
            }
            (slot, PageOutcome::NoData) => {
                tracing::warn!("page 1 returned no data for {slot:?}");
            }
            (_, PageOutcome::Loaded(_)) if !self.accepts_secondary() => {
                tracing::debug!("ignoring {:?} result, page has no data", tag.slot);
            }
            (Slot::Highlights, PageOutcome::Loaded(data)) => {
                self.highlight_entries = view_model::highlight_entries(&data.results, &self.settings);
            }
            (Slot::HighlightedUser, PageOutcome::Loaded(data)) => {
                if self.primary_has_highlighted_rank() {
                    return;
                }
                let rows = view_model::table_rows(&data.results, &self.settings.subjects);
                self.highlighted_user_row =
                    view_model::highlighted_user_row(&rows, self.settings.highlighted_rank);
            }
        }
    }
}
