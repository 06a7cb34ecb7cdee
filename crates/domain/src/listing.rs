use std::cmp::Ordering;

use backoffice_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sort direction of a list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Fields matched by the free-text search box.
const SEARCH_FIELDS: &[&str] = &["name", "username", "email", "title"];

/// One row of an admin list endpoint, kept as the backend's JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRow(Map<String, Value>);

impl ResourceRow {
    /// Wraps a JSON object row.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the raw field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    /// Returns the numeric row id, if present.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.field("id").and_then(Value::as_i64)
    }

    /// Returns the first human label among name, username, title and email.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        ["name", "username", "title", "email"]
            .iter()
            .find_map(|name| self.field(name).and_then(Value::as_str))
    }

    /// Returns the status flag, if present.
    #[must_use]
    pub fn status(&self) -> Option<i64> {
        self.field("status").and_then(Value::as_i64)
    }

    /// Returns the creation timestamp, accepting RFC3339 or naive timestamps.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.field("created_at").and_then(Value::as_str)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }

    fn matches_search(&self, needle: &str) -> bool {
        SEARCH_FIELDS.iter().any(|name| {
            self.field(name)
                .and_then(Value::as_str)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }
}

/// Search, date-range, sort and pagination settings of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring matched against the search fields.
    pub search: Option<String>,
    /// Inclusive lower bound on the creation day.
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation day.
    pub created_to: Option<NaiveDate>,
    /// Column the rows are ordered by.
    pub sort_by: String,
    /// Sort direction.
    pub direction: SortDirection,
    /// Zero-based page index.
    pub page: usize,
    /// Rows per page.
    pub rows_per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            created_from: None,
            created_to: None,
            sort_by: "name".to_owned(),
            direction: SortDirection::Asc,
            page: 0,
            rows_per_page: 5,
        }
    }
}

/// One page of filtered and sorted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    /// Rows of the requested page.
    pub rows: Vec<ResourceRow>,
    /// Rows matching the filters before pagination.
    pub total: usize,
}

impl ListQuery {
    /// Validates paging and date bounds.
    pub fn validate(&self) -> AppResult<()> {
        if self.rows_per_page == 0 {
            return Err(AppError::Validation(
                "rows per page must be greater than zero".to_owned(),
            ));
        }

        if let (Some(from), Some(to)) = (self.created_from, self.created_to)
            && from > to
        {
            return Err(AppError::Validation(format!(
                "date range start {from} is after end {to}"
            )));
        }

        Ok(())
    }

    /// Filters, sorts and paginates `rows`.
    #[must_use]
    pub fn apply(&self, rows: Vec<ResourceRow>) -> ListPage {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        let mut filtered: Vec<ResourceRow> = rows
            .into_iter()
            .filter(|row| needle.as_deref().is_none_or(|needle| row.matches_search(needle)))
            .filter(|row| self.within_date_range(row))
            .collect();

        filtered.sort_by(|left, right| {
            compare_fields(
                left.field(self.sort_by.as_str()),
                right.field(self.sort_by.as_str()),
                self.direction,
            )
        });

        let total = filtered.len();
        let rows_per_page = self.rows_per_page.max(1);
        let rows = filtered
            .into_iter()
            .skip(self.page.saturating_mul(rows_per_page))
            .take(rows_per_page)
            .collect();

        ListPage { rows, total }
    }

    fn within_date_range(&self, row: &ResourceRow) -> bool {
        if self.created_from.is_none() && self.created_to.is_none() {
            return true;
        }

        let Some(created_on) = row.created_at().map(|value| value.date_naive()) else {
            return false;
        };

        self.created_from.is_none_or(|from| created_on >= from)
            && self.created_to.is_none_or(|to| created_on <= to)
    }
}

/// Missing values sort last in either direction.
fn compare_fields(left: Option<&Value>, right: Option<&Value>, direction: SortDirection) -> Ordering {
    let (left, right) = match (left, right) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(left), Some(right)) => (left, right),
    };

    let ordering = match (left, right) {
        (Value::Number(left), Value::Number(right)) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(left), Value::String(right)) => left.cmp(right),
        (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
        (left, right) => type_rank(left).cmp(&type_rank(right)),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
