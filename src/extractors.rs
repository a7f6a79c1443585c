use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::{
    models::SubjectConfig,
    rejections::AppError,
    services::view_model::{FilterCriteria, SortDirection, SortField, SortSpec},
    AppState,
};

/// Extracts whether the request is an HTMX request by checking the `HX-Request` header.
pub struct IsHtmx(pub bool);

impl<S: Send + Sync> FromRequestParts<S> for IsHtmx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");
        Ok(IsHtmx(is_htmx))
    }
}

/// Raw query of the leaderboard page. HTML forms send every field, so empty
/// strings are treated as absent.
#[derive(Deserialize)]
struct LeaderboardQuery {
    page: Option<String>,
    q: Option<String>,
    min_score: Option<String>,
    max_score: Option<String>,
    min_accuracy: Option<String>,
    max_accuracy: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_number(value: Option<String>, error: &'static str) -> Result<Option<f64>, AppError> {
    non_empty(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(AppError::Input(error))
        })
        .transpose()
}

impl LeaderboardQuery {
    fn page(&mut self) -> Result<u32, AppError> {
        match non_empty(self.page.take()) {
            None => Ok(1),
            Some(page) => page
                .parse::<u32>()
                .ok()
                .filter(|&p| p > 0)
                .ok_or(AppError::Input("page must be a positive integer")),
        }
    }

    fn criteria(&mut self) -> Result<FilterCriteria, AppError> {
        Ok(FilterCriteria {
            search_text: non_empty(self.q.take()),
            min_score: optional_number(self.min_score.take(), "invalid min_score")?,
            max_score: optional_number(self.max_score.take(), "invalid max_score")?,
            min_accuracy: optional_number(self.min_accuracy.take(), "invalid min_accuracy")?,
            max_accuracy: optional_number(self.max_accuracy.take(), "invalid max_accuracy")?,
        })
    }

    fn sort(&mut self, subjects: &[SubjectConfig]) -> Result<SortSpec, AppError> {
        let field = match non_empty(self.sort.take()) {
            None => SortField::default(),
            Some(field) => {
                SortField::parse(&field, subjects).ok_or(AppError::Input("unknown sort field"))?
            }
        };
        let direction = match non_empty(self.order.take()).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return Err(AppError::Input("order must be asc or desc")),
        };
        Ok(SortSpec { field, direction })
    }
}

/// Page, filter and sort requested for the leaderboard page. Subject sort
/// fields are checked against the configured subjects.
#[derive(Debug, PartialEq)]
pub struct LeaderboardParams {
    pub page: u32,
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
}

impl FromRequestParts<AppState> for LeaderboardParams {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(mut query) = Query::<LeaderboardQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::Input("malformed query string"))?;

        Ok(LeaderboardParams {
            page: query.page()?,
            criteria: query.criteria()?,
            sort: query.sort(&state.leaderboard.settings().subjects)?,
        })
    }
}
