//! HTTP handlers, one module per area of the site.

pub mod auth;
pub mod health;
pub mod intake;
pub mod patients;
pub mod review;

use crate::error::ApiError;
use serde::Deserialize;
use tracker_core::{CurrentStatus, Gender, ListFilter, ListQuery, SortOrder};
use utoipa::IntoParams;

/// Filtering, sorting and paging shared by the patient listing and the report queue.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Substring of the name, case-insensitive.
    pub name: Option<String>,
    pub detected_state: Option<String>,
    pub detected_district: Option<String>,
    pub gender: Option<String>,
    pub current_status: Option<String>,
    /// Column to sort by; prefix with `-` for descending.
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// `csv`, `json`, `latex` or `tsv` (patient listing only).
    #[serde(rename = "_export")]
    pub export: Option<String>,
}

impl ListParams {
    /// Build a core query, using `default_page_size` when `per_page` is absent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for an unknown gender or status value.
    pub fn into_query(self, default_page_size: usize) -> Result<ListQuery, ApiError> {
        let gender = parse_choice("gender", self.gender.as_deref(), Gender::parse)?;
        let current_status = parse_choice(
            "current_status",
            self.current_status.as_deref(),
            CurrentStatus::parse,
        )?;

        let filter = ListFilter {
            name: self.name,
            detected_state: self.detected_state,
            detected_district: self.detected_district,
            gender,
            current_status,
        };
        let sort = self
            .sort
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        Ok(ListQuery::first_page(self.per_page.unwrap_or(default_page_size))
            .with_filter(filter)
            .with_sort(sort)
            .with_page(self.page.unwrap_or(1)))
    }
}

fn parse_choice<T>(
    field: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown {field} '{v}'"))),
    }
}
