//! Pure reshaping of ranked results into what the leaderboard page shows:
//! podium cards, table rows, the pinned row for the viewer, and the
//! filtered/sorted projection of the table.

use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::{default_subjects, LeaderboardResponse, RankedResult, SubjectConfig, Subjects},
    names, utils,
};

#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    /// Rank standing in for the current viewer until real identity exists.
    pub highlighted_rank: u32,
    pub subjects: Subjects,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            highlighted_rank: names::DEFAULT_HIGHLIGHTED_RANK,
            subjects: default_subjects(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PageData {
    pub results: Vec<RankedResult>,
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum PageOutcome {
    Loaded(PageData),
    NoData,
}

/// Read a gateway body. Anything without `success: true` and a `data.results`
/// array, or that fails to decode, is [`PageOutcome::NoData`].
pub fn parse_page(body: &Value) -> PageOutcome {
    let response = match LeaderboardResponse::deserialize(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("leaderboard payload did not decode: {e}");
            return PageOutcome::NoData;
        }
    };

    match response.data {
        Some(data) if response.success => match data.results {
            Some(results) => PageOutcome::Loaded(PageData {
                results,
                total_count: data.total_count,
            }),
            None => PageOutcome::NoData,
        },
        _ => PageOutcome::NoData,
    }
}

/// `ceil(total / PAGE_SIZE)`, where a missing or zero count means the default.
pub fn total_pages(total_count: Option<u64>) -> u32 {
    let total = total_count
        .filter(|&count| count > 0)
        .unwrap_or(names::DEFAULT_TOTAL_COUNT);
    let pages = total.div_ceil(u64::from(names::PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectScore {
    pub subject: SubjectConfig,
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    First,
    Second,
    Third,
    HighlightedOther,
}

impl Tier {
    fn from_position(index: usize) -> Self {
        match index {
            0 => Tier::First,
            1 => Tier::Second,
            _ => Tier::Third,
        }
    }

    pub fn is_podium(self) -> bool {
        !matches!(self, Tier::HighlightedOther)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightEntry {
    pub id: String,
    pub name: String,
    pub rank: u32,
    pub rank_suffix: &'static str,
    pub tier: Tier,
    pub overall_score: i64,
    pub max_score: i64,
    pub accuracy: f64,
    pub avatar: String,
    pub subjects: Vec<SubjectScore>,
}

impl HighlightEntry {
    pub fn subject_score(&self, subject_id: &str) -> i64 {
        score_for(&self.subjects, subject_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub overall_score: i64,
    pub max_score: i64,
    pub accuracy: f64,
    pub avatar: String,
    pub subjects: Vec<SubjectScore>,
}

impl TableRow {
    pub fn subject_score(&self, subject_id: &str) -> i64 {
        score_for(&self.subjects, subject_id)
    }
}

fn score_for(subjects: &[SubjectScore], subject_id: &str) -> i64 {
    subjects
        .iter()
        .find(|s| s.subject.id == subject_id)
        .map_or(0, |s| s.score)
}

fn subject_scores(result: &RankedResult, subjects: &[SubjectConfig]) -> Vec<SubjectScore> {
    subjects
        .iter()
        .map(|config| SubjectScore {
            subject: config.clone(),
            score: utils::round_score(result.subject_score(config.name).unwrap_or(0.0)),
        })
        .collect()
}

fn avatar(result: &RankedResult) -> String {
    result
        .user
        .profile_picture
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(names::PLACEHOLDER_AVATAR)
        .to_string()
}

fn highlight_entry(result: &RankedResult, tier: Tier, subjects: &[SubjectConfig]) -> HighlightEntry {
    HighlightEntry {
        id: result.user.id.clone(),
        name: result.user.name.clone(),
        rank: result.rank,
        rank_suffix: utils::ordinal_suffix(result.rank),
        tier,
        overall_score: utils::round_score(result.total_mark_scored),
        max_score: names::MAX_SCORE,
        accuracy: utils::round_accuracy(result.accuracy),
        avatar: avatar(result),
        subjects: subject_scores(result, subjects),
    }
}

/// Podium cards from a page-1 result set: the first three entries by
/// position, then the entry at the highlighted rank when present.
pub fn highlight_entries(
    page_one: &[RankedResult],
    settings: &LeaderboardSettings,
) -> Vec<HighlightEntry> {
    let mut entries: Vec<HighlightEntry> = page_one
        .iter()
        .take(names::PODIUM_SIZE)
        .enumerate()
        .map(|(index, result)| {
            highlight_entry(result, Tier::from_position(index), &settings.subjects)
        })
        .collect();

    let already_shown = entries.iter().any(|e| e.rank == settings.highlighted_rank);
    if !already_shown {
        if let Some(result) = page_one.iter().find(|r| r.rank == settings.highlighted_rank) {
            entries.push(highlight_entry(
                result,
                Tier::HighlightedOther,
                &settings.subjects,
            ));
        }
    }

    entries
}

pub fn table_rows(results: &[RankedResult], subjects: &[SubjectConfig]) -> Vec<TableRow> {
    results
        .iter()
        .map(|result| TableRow {
            id: result.user.id.clone(),
            rank: result.rank,
            name: result.user.name.clone(),
            overall_score: utils::round_score(result.total_mark_scored),
            max_score: names::MAX_SCORE,
            accuracy: utils::round_accuracy(result.accuracy),
            avatar: avatar(result),
            subjects: subject_scores(result, subjects),
        })
        .collect()
}

/// The pinned row for the viewer, labelled so it reads apart from the table.
pub fn highlighted_user_row(rows: &[TableRow], highlighted_rank: u32) -> Option<TableRow> {
    rows.iter()
        .find(|row| row.rank == highlighted_rank)
        .map(|row| TableRow {
            name: format!("{}{}", row.name, names::HIGHLIGHTED_USER_LABEL),
            ..row.clone()
        })
}

// ---------------------------------------------------------------------------
// Filtering and sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_accuracy: Option<f64>,
    pub max_accuracy: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    pub fn matches(&self, row: &TableRow) -> bool {
        let name_matches = match self.search_text.as_deref() {
            Some(query) if !query.is_empty() => {
                row.name.to_lowercase().contains(&query.to_lowercase())
            }
            _ => true,
        };

        let score = row.overall_score as f64;

        name_matches
            && self.min_score.is_none_or(|min| score >= min)
            && self.max_score.is_none_or(|max| score <= max)
            && self.min_accuracy.is_none_or(|min| row.accuracy >= min)
            && self.max_accuracy.is_none_or(|max| row.accuracy <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Rank,
    Score,
    Accuracy,
    /// Score in one subject, by [`SubjectConfig::id`].
    Subject(String),
}

impl SortField {
    /// Parse a query value, accepting only subjects that are configured.
    pub fn parse(value: &str, subjects: &[SubjectConfig]) -> Option<Self> {
        match value {
            "rank" => Some(SortField::Rank),
            "score" => Some(SortField::Score),
            "accuracy" => Some(SortField::Accuracy),
            other => subjects
                .iter()
                .find(|s| s.id == other)
                .map(|s| SortField::Subject(s.id.to_string())),
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            SortField::Rank => "rank",
            SortField::Score => "score",
            SortField::Accuracy => "accuracy",
            SortField::Subject(id) => id.as_str(),
        }
    }

    fn compare(&self, a: &TableRow, b: &TableRow) -> Ordering {
        match self {
            SortField::Rank => a.rank.cmp(&b.rank),
            SortField::Score => a.overall_score.cmp(&b.overall_score),
            SortField::Accuracy => a
                .accuracy
                .partial_cmp(&b.accuracy)
                .unwrap_or(Ordering::Equal),
            SortField::Subject(id) => a.subject_score(id).cmp(&b.subject_score(id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort applied when a column header is clicked: the active column flips
    /// direction, any other column starts ascending.
    pub fn toggled(&self, field: SortField) -> SortSpec {
        if self.field == field {
            SortSpec {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortSpec {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    fn compare(&self, a: &TableRow, b: &TableRow) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Filter then stable-sort the rows. Recomputed from scratch on every change.
pub fn project(rows: &[TableRow], criteria: &FilterCriteria, sort: &SortSpec) -> Vec<TableRow> {
    let mut projected: Vec<TableRow> = rows
        .iter()
        .filter(|row| criteria.matches(row))
        .cloned()
        .collect();
    projected.sort_by(|a, b| sort.compare(a, b));
    projected
}

/// Rows the table actually shows: on page 1 the podium ranks are already on
/// cards, so they are left out.
pub fn visible_rows<'a>(
    projection: &'a [TableRow],
    highlights: &[HighlightEntry],
    page: u32,
) -> Vec<&'a TableRow> {
    projection
        .iter()
        .filter(|row| {
            page != 1
                || !highlights
                    .iter()
                    .any(|h| h.tier.is_podium() && h.rank == row.rank)
        })
        .collect()
}
