//! Filtering, sorting and pagination for report and patient listings.
//!
//! Sort columns are a closed set, so user input never reaches the SQL text; filter values are
//! always bound parameters.

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{CurrentStatus, Gender};
use rusqlite::types::Value;

/// Column filters shared by the report queue and the patient listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring match on `name`.
    pub name: Option<String>,
    /// Case-insensitive exact match.
    pub detected_state: Option<String>,
    /// Case-insensitive exact match.
    pub detected_district: Option<String>,
    pub gender: Option<Gender>,
    pub current_status: Option<CurrentStatus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Age,
    DetectedDistrict,
    DetectedState,
    CurrentStatus,
    DiagnosedDate,
    CreatedAt,
}

impl SortColumn {
    fn column(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Age => "age",
            SortColumn::DetectedDistrict => "detected_district",
            SortColumn::DetectedState => "detected_state",
            SortColumn::CurrentStatus => "current_status",
            SortColumn::DiagnosedDate => "diagnosed_date",
            SortColumn::CreatedAt => "created_at",
        }
    }

    fn from_column(name: &str) -> Option<Self> {
        Some(match name {
            "id" => SortColumn::Id,
            "name" => SortColumn::Name,
            "age" => SortColumn::Age,
            "detected_district" => SortColumn::DetectedDistrict,
            "detected_state" => SortColumn::DetectedState,
            "current_status" => SortColumn::CurrentStatus,
            "diagnosed_date" => SortColumn::DiagnosedDate,
            "created_at" => SortColumn::CreatedAt,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub descending: bool,
}

impl SortOrder {
    /// Parse `column` or `-column` (descending). Unknown columns yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (descending, name) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        SortColumn::from_column(name).map(|column| Self { column, descending })
    }

    pub(crate) fn order_by(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        // id breaks ties so paging is stable.
        format!("{} {direction}, id {direction}", self.column.column())
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            descending: false,
        }
    }
}

/// A full listing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: ListFilter,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl ListQuery {
    /// First page with the given size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn first_page(per_page: usize) -> Self {
        Self {
            filter: ListFilter::default(),
            sort: SortOrder::default(),
            page: 1,
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn with_filter(mut self, filter: ListFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the 1-based page; zero is treated as the first page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub(crate) fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = (self.page.max(1) - 1).saturating_mul(per_page);
        (
            i64::try_from(per_page).unwrap_or(i64::MAX),
            i64::try_from(offset).unwrap_or(i64::MAX),
        )
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total row count across all pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn num_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as u64)
    }
}

/// Build a `WHERE` clause for `filter`, prefixed by any mandatory conditions.
///
/// Returns the clause (empty when there is nothing to filter) and its bound values, in order.
pub(crate) fn where_clause(
    filter: &ListFilter,
    mut conditions: Vec<String>,
    mut values: Vec<Value>,
) -> (String, Vec<Value>) {
    if let Some(name) = non_blank(&filter.name) {
        conditions.push("name LIKE ? ESCAPE '\\'".into());
        values.push(Value::Text(format!("%{}%", escape_like(name))));
    }
    if let Some(state) = non_blank(&filter.detected_state) {
        conditions.push("lower(detected_state) = lower(?)".into());
        values.push(Value::Text(state.to_string()));
    }
    if let Some(district) = non_blank(&filter.detected_district) {
        conditions.push("lower(detected_district) = lower(?)".into());
        values.push(Value::Text(district.to_string()));
    }
    if let Some(gender) = filter.gender {
        conditions.push("gender = ?".into());
        values.push(Value::Text(gender.as_str().to_string()));
    }
    if let Some(status) = filter.current_status {
        conditions.push("current_status = ?".into());
        values.push(Value::Text(status.as_str().to_string()));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), values)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parses_direction_and_rejects_unknown_columns() {
        assert_eq!(
            SortOrder::parse("-age"),
            Some(SortOrder {
                column: SortColumn::Age,
                descending: true
            })
        );
        assert_eq!(
            SortOrder::parse("detected_state"),
            Some(SortOrder {
                column: SortColumn::DetectedState,
                descending: false
            })
        );
        assert_eq!(SortOrder::parse("password_hash"), None);
        assert_eq!(SortOrder::parse("-name; DROP TABLE reports"), None);
    }

    #[test]
    fn test_where_clause_is_empty_without_filters() {
        let (clause, values) = where_clause(&ListFilter::default(), vec![], vec![]);
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_where_clause_escapes_like_wildcards() {
        let filter = ListFilter {
            name: Some("50%_off".into()),
            detected_state: Some("  ".into()),
            ..ListFilter::default()
        };
        let (clause, values) = where_clause(&filter, vec![], vec![]);
        assert_eq!(clause, "WHERE name LIKE ? ESCAPE '\\'");
        assert_eq!(values, vec![Value::Text("%50\\%\\_off%".into())]);
    }

    #[test]
    fn test_where_clause_keeps_mandatory_conditions_first() {
        let filter = ListFilter {
            gender: Some(Gender::Female),
            ..ListFilter::default()
        };
        let (clause, values) = where_clause(
            &filter,
            vec!["report_state = ?".into()],
            vec![Value::Text("reported".into())],
        );
        assert_eq!(clause, "WHERE report_state = ? AND gender = ?");
        assert_eq!(
            values,
            vec![
                Value::Text("reported".into()),
                Value::Text("female".into())
            ]
        );
    }

    #[test]
    fn test_limit_offset_and_page_count() {
        let query = ListQuery::first_page(10).with_page(3);
        assert_eq!(query.limit_offset(), (10, 20));

        let page: Page<()> = Page {
            items: vec![],
            total: 21,
            page: 3,
            per_page: 10,
        };
        assert_eq!(page.num_pages(), 3);
    }
}
