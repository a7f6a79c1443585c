use maud::{html, Markup};

use crate::{
    models::SubjectConfig,
    names,
    services::{
        view_model::{self, HighlightEntry, SortDirection, SortField, TableRow, Tier},
        view_state::{Status, ViewState},
    },
    views::components::{avatar, disabled_link, nav_link},
};

const BREADCRUMB: &str =
    "JEE Main Test series / Quant Part Test / Quant Part Test (QPT) - 1 (Old) / Analysis / Leaderboard";

pub fn leaderboard(state: &ViewState) -> Markup {
    html! {
        hgroup {
            h1 { "Leaderboard" }
            p { small { (BREADCRUMB) } }
        }

        (filter_form(state))

        @match &state.status {
            Status::Failed(message) => { (failed(state, message)) }
            Status::NoData => { (no_data()) }
            Status::Loading | Status::Loaded => { (loaded(state)) }
        }
    }
}

fn current_url(state: &ViewState) -> String {
    names::leaderboard_url(state.page, &state.filter_criteria, &state.sort_spec)
}

fn failed(state: &ViewState, message: &str) -> Markup {
    html! {
        article.error {
            p { (message) }
            (nav_link(&current_url(state), html! { "Try Again" }))
        }
    }
}

fn no_data() -> Markup {
    html! {
        article.no-data {
            p { "No leaderboard data available" }
        }
    }
}

fn loaded(state: &ViewState) -> Markup {
    let projection = state.projection();
    let rows = view_model::visible_rows(&projection, &state.highlight_entries, state.page);
    let subjects = &state.settings().subjects;

    html! {
        @if !state.highlight_entries.is_empty() {
            section.highlights {
                @for entry in &state.highlight_entries {
                    (highlight_card(entry))
                }
            }
        }

        figure {
            table.ranking {
                thead { (table_header(state, subjects)) }
                tbody {
                    @for row in &rows {
                        (table_row(row, row_class(state, row)))
                    }
                    @if rows.is_empty() {
                        tr { td colspan=(subjects.len() + 4) { "No students match the current filters" } }
                    }
                }
            }
        }

        p.range { small { (range_caption(state.page)) } }

        (pager(state))

        @if let Some(row) = &state.highlighted_user_row {
            figure.pinned {
                table {
                    tbody { (table_row(row, "row pinned")) }
                }
            }
        }
    }
}

/// The viewer's own row is dimmed in the table since it is pinned below.
fn row_class(state: &ViewState, row: &TableRow) -> &'static str {
    match &state.highlighted_user_row {
        Some(own) if own.id == row.id => "row own",
        _ => "row",
    }
}

fn subject_icon(subject: &SubjectConfig) -> Markup {
    html! {
        span.icon aria-hidden="true" { (subject.icon) }
    }
}

fn tier_class(tier: Tier) -> &'static str {
    match tier {
        Tier::First => "card first",
        Tier::Second => "card second",
        Tier::Third => "card third",
        Tier::HighlightedOther => "card you",
    }
}

fn highlight_card(entry: &HighlightEntry) -> Markup {
    html! {
        article class=(tier_class(entry.tier)) data-rank=(entry.rank) {
            header {
                img.avatar src=(entry.avatar) alt=(entry.name) width="64" height="64";
                h3 {
                    (entry.name)
                    @if entry.tier == Tier::HighlightedOther {
                        (names::HIGHLIGHTED_USER_LABEL)
                    }
                }
                p { (entry.rank) sup { (entry.rank_suffix) } " Rank" }
            }
            dl {
                dt { "Overall Score" }
                dd { strong { (entry.overall_score) } "/" (entry.max_score) }
                @for subject in &entry.subjects {
                    dt style=(format!("color: {}", subject.subject.color)) {
                        (subject_icon(&subject.subject))
                        (subject.subject.short_name) " Score"
                    }
                    dd { (subject.score) }
                }
                dt { "Accuracy" }
                dd { (format!("{}%", entry.accuracy)) }
            }
        }
    }
}

fn sort_header(state: &ViewState, label: Markup, field: SortField) -> Markup {
    let active = state.sort_spec.field == field;
    let href = names::leaderboard_url(
        state.page,
        &state.filter_criteria,
        &state.sort_spec.toggled(field),
    );
    let indicator = match (active, state.sort_spec.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ▲",
        (true, SortDirection::Desc) => " ▼",
    };

    html! {
        th aria-sort=[active.then(|| match state.sort_spec.direction {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        })] {
            (nav_link(&href, html! { (label) (indicator) }))
        }
    }
}

fn table_header(state: &ViewState, subjects: &[SubjectConfig]) -> Markup {
    html! {
        tr {
            (sort_header(state, html! { "Rank" }, SortField::Rank))
            th { "Student Name" }
            (sort_header(state, html! { "Overall Score" }, SortField::Score))
            @for subject in subjects {
                (sort_header(
                    state,
                    html! { (subject_icon(subject)) (subject.short_name) },
                    SortField::Subject(subject.id.to_string()),
                ))
            }
            (sort_header(state, html! { "Accuracy" }, SortField::Accuracy))
        }
    }
}

fn table_row(row: &TableRow, class: &str) -> Markup {
    html! {
        tr class=(class) data-rank=(row.rank) {
            td.rank { (row.rank) }
            td.name {
                (avatar(&row.avatar, &row.name))
                " "
                (row.name)
            }
            td.score { strong { (row.overall_score) } "/" (row.max_score) }
            @for subject in &row.subjects {
                td.subject { (subject.score) }
            }
            td.accuracy { (format!("{}%", row.accuracy)) }
        }
    }
}

/// On page 1 the first three ranks sit on the cards above the table.
fn range_caption(page: u32) -> String {
    if page == 1 {
        format!("Showing ranks {}-{}", names::PODIUM_SIZE + 1, names::PAGE_SIZE)
    } else {
        let first = u64::from(page - 1) * u64::from(names::PAGE_SIZE) + 1;
        let last = u64::from(page) * u64::from(names::PAGE_SIZE);
        format!("Showing ranks {first}-{last}")
    }
}

fn page_link(state: &ViewState, page: u32, label: Markup) -> Markup {
    let href = names::leaderboard_url(page, &state.filter_criteria, &state.sort_spec);
    nav_link(&href, label)
}

fn pager(state: &ViewState) -> Markup {
    let total = state.total_pages;
    let visible = total.min(names::MAX_VISIBLE_PAGE_LINKS);

    html! {
        nav.pager aria-label="Pagination" {
            ul {
                li {
                    @if state.page <= 1 {
                        (disabled_link(html! { "Previous" }))
                    } @else {
                        (page_link(state, state.page - 1, html! { "Previous" }))
                    }
                }
                @for page in 1..=visible {
                    li {
                        @if page == state.page {
                            a aria-current="page" { (page) }
                        } @else {
                            (page_link(state, page, html! { (page) }))
                        }
                    }
                }
                @if total > names::MAX_VISIBLE_PAGE_LINKS {
                    li { "..." }
                    li {
                        @if total == state.page {
                            a aria-current="page" { (total) }
                        } @else {
                            (page_link(state, total, html! { (total) }))
                        }
                    }
                }
                li {
                    @if state.page >= total {
                        (disabled_link(html! { "Next" }))
                    } @else {
                        (page_link(state, state.page + 1, html! { "Next" }))
                    }
                }
            }
        }
    }
}

fn sort_option(value: &str, label: &str, selected: bool) -> Markup {
    html! {
        option value=(value) selected[selected] { (label) }
    }
}

fn filter_form(state: &ViewState) -> Markup {
    let criteria = &state.filter_criteria;
    let sort = &state.sort_spec;

    html! {
        details.filters open[!criteria.is_empty()] {
            summary { "Filters & Sorting" }
            form method="get"
                 action=(names::LEADERBOARD_URL)
                 hx-get=(names::LEADERBOARD_URL)
                 hx-target="main"
                 hx-push-url="true" {
                input type="hidden" name="page" value=(state.page);
                input type="search"
                      name="q"
                      placeholder="Search student..."
                      value=[criteria.search_text.as_deref()];
                fieldset.grid {
                    label {
                        "Min score"
                        input type="number" name="min_score" value=[criteria.min_score];
                    }
                    label {
                        "Max score"
                        input type="number" name="max_score" value=[criteria.max_score];
                    }
                }
                fieldset.grid {
                    label {
                        "Min accuracy (%)"
                        input type="number" step="0.01" name="min_accuracy" value=[criteria.min_accuracy];
                    }
                    label {
                        "Max accuracy (%)"
                        input type="number" step="0.01" name="max_accuracy" value=[criteria.max_accuracy];
                    }
                }
                fieldset.grid {
                    label {
                        "Sort by"
                        select name="sort" {
                            (sort_option("rank", "Rank", sort.field == SortField::Rank))
                            (sort_option("score", "Overall Score", sort.field == SortField::Score))
                            (sort_option("accuracy", "Accuracy", sort.field == SortField::Accuracy))
                            @for subject in &state.settings().subjects {
                                (sort_option(
                                    subject.id,
                                    subject.name,
                                    sort.field.as_param() == subject.id,
                                ))
                            }
                        }
                    }
                    label {
                        "Order"
                        select name="order" {
                            (sort_option("asc", "Ascending", sort.direction == SortDirection::Asc))
                            (sort_option("desc", "Descending", sort.direction == SortDirection::Desc))
                        }
                    }
                }
                button type="submit" { "Apply" }
                @if !criteria.is_empty() || *sort != Default::default() {
                    (nav_link(names::LEADERBOARD_URL, html! { "Reset" }))
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::default_subjects;
    use crate::services::{
        view_model::{parse_page, FilterCriteria, LeaderboardSettings, SortSpec},
        view_state::{FetchTag, Slot, Update},
    };

    fn loaded_page(page: u32, first_rank: u32) -> ViewState {
        let results: Vec<_> = (first_rank..first_rank + 10)
            .map(|rank| {
                json!({
                    "rank": rank,
                    "userId": { "_id": format!("u{rank}"), "name": format!("Student {rank}"), "profilePicture": "" },
                    "totalMarkScored": 250.0,
                    "accuracy": 87.456,
                    "subjects": []
                })
            })
            .collect();
        let body = json!({ "success": true, "data": { "results": results, "totalCount": 80 } });

        ViewState::new(LeaderboardSettings::default())
            .reduce(Update::PageRequested(page))
            .reduce(Update::Fetched {
                tag: FetchTag::new(page, Slot::Primary),
                outcome: parse_page(&body),
            })
    }

    #[test]
    fn range_caption_skips_podium_on_page_one() {
        assert_eq!(range_caption(1), "Showing ranks 4-10");
        assert_eq!(range_caption(3), "Showing ranks 21-30");
        assert_eq!(
            range_caption(u32::MAX),
            "Showing ranks 42949672941-42949672950"
        );
    }

    #[test]
    fn page_far_past_the_end_renders_empty_table() {
        let body = json!({ "success": true, "data": { "results": [], "totalCount": 57 } });
        let state = ViewState::new(LeaderboardSettings::default())
            .reduce(Update::PageRequested(500_000_000))
            .reduce(Update::Fetched {
                tag: FetchTag::new(500_000_000, Slot::Primary),
                outcome: parse_page(&body),
            });

        let html = leaderboard(&state).into_string();

        assert!(html.contains("Showing ranks 4999999991-5000000000"));
        assert!(html.contains("No students match the current filters"));
        assert!(html.contains(r#"<a aria-disabled="true">Next</a>"#));
    }

    #[test]
    fn page_one_table_leaves_out_podium_rows() {
        let html = leaderboard(&loaded_page(1, 1)).into_string();

        assert!(html.contains(r#"class="card first" data-rank="1""#));
        assert!(html.contains(r#"class="card you" data-rank="8""#));
        assert!(!html.contains(r#"class="row" data-rank="1""#));
        assert!(html.contains(r#"class="row" data-rank="4""#));
        assert!(html.contains(r#"class="row pinned" data-rank="8""#));
        assert!(html.contains("Student 8 (You)"));
        assert!(html.contains("87.46%"));
    }

    #[test]
    fn own_row_is_dimmed_in_the_table() {
        let html = leaderboard(&loaded_page(1, 1)).into_string();

        assert!(html.contains(r#"class="row own" data-rank="8""#));
        assert!(!html.contains(r#"class="row own" data-rank="7""#));
        assert!(html.contains(r#"class="row" data-rank="7""#));
    }

    #[test]
    fn subject_icons_label_headers_and_cards() {
        let html = leaderboard(&loaded_page(1, 1)).into_string();

        for subject in default_subjects() {
            let icon = format!(r#"<span class="icon" aria-hidden="true">{}</span>"#, subject.icon);
            assert_eq!(html.matches(&icon).count(), 5, "{}", subject.id);
        }
    }

    #[test]
    fn pager_shows_five_links_then_last_page() {
        let html = pager(&loaded_page(2, 11)).into_string();

        assert!(html.contains(r#"href="/?page=5""#));
        assert!(!html.contains(r#"href="/?page=6""#));
        assert!(html.contains(r#"href="/?page=8""#));
        assert!(html.contains("..."));
        assert!(html.contains(r#"aria-current="page">2<"#));
        assert!(html.contains(r#"href="/?page=1""#));
        assert!(html.contains(r#"href="/?page=3""#));
    }

    #[test]
    fn pager_disables_previous_on_first_page() {
        let html = pager(&loaded_page(1, 1)).into_string();
        assert!(html.contains(r#"<a aria-disabled="true">Previous</a>"#));
    }

    #[test]
    fn failed_state_offers_retry() {
        let state = ViewState::new(LeaderboardSettings::default())
            .reduce(Update::PageRequested(2))
            .reduce(Update::FetchFailed {
                tag: FetchTag::new(2, Slot::Primary),
            });

        let html = leaderboard(&state).into_string();

        assert!(html.contains("Failed to fetch leaderboard data"));
        assert!(html.contains("Try Again"));
        assert!(html.contains(r#"href="/?page=2""#));
    }

    #[test]
    fn sort_headers_toggle_direction() {
        let state = loaded_page(1, 1).reduce(Update::SortChanged(SortSpec::default()));
        let html = table_header(&state, &state.settings().subjects).into_string();

        assert!(html.contains(r#"href="/?page=1&amp;sort=rank&amp;order=desc""#));
        assert!(html.contains(r#"href="/?page=1&amp;sort=physics&amp;order=asc""#));
    }

    #[test]
    fn empty_projection_says_so() {
        let state = loaded_page(2, 11).reduce(Update::FilterChanged(FilterCriteria {
            search_text: Some("nobody".to_string()),
            ..FilterCriteria::default()
        }));

        let html = leaderboard(&state).into_string();

        assert!(html.contains("No students match the current filters"));
    }
}
