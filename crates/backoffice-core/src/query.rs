//! # Query Pipeline
//!
//! The filter → sort → paginate pipeline shared by the data table and the
//! repositories.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  rows ──► filter (search / facets) ──► sort (one key) ──► paginate     │
//! │                                                                         │
//! │  • every stage starts from its input, never from a previous result,    │
//! │    so re-running the same query yields the same rows                   │
//! │  • sort compares CellValues with `<` / `>`; Empty always goes last     │
//! │  • paginate keeps the requested page inside [1, total_pages]           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dates::{format_dmy, TIME_FORMAT};
use crate::money::Money;

// =============================================================================
// Cell Value
// =============================================================================

/// The value an accessor returns for one column of one record.
///
/// `Empty` plays the role of a missing value: it renders as an empty cell
/// and sorts after everything else in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Money(Money),
    #[serde(serialize_with = "crate::dates::dmy::serialize")]
    Date(NaiveDate),
    #[serde(serialize_with = "crate::dates::hm::serialize")]
    Time(NaiveTime),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Compares two present values.
    ///
    /// Values of the same kind use their natural order; mixed kinds fall back
    /// to comparing their rendered text.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Money(a), CellValue::Money(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Time(a), CellValue::Time(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Money(m) => write!(f, "{}", m),
            CellValue::Date(d) => f.write_str(&format_dmy(*d)),
            CellValue::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<Money> for CellValue {
    fn from(value: Money) -> Self {
        CellValue::Money(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(value: NaiveTime) -> Self {
        CellValue::Time(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

// =============================================================================
// Sorting
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Orders two cells, keeping `Empty` last regardless of direction.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(a.compare(b)),
    }
}

/// Stable sort by one key.
///
/// Each row's key is computed once, not once per comparison.
pub fn sort_rows<R, F>(rows: Vec<R>, key: F, direction: SortDirection) -> Vec<R>
where
    F: Fn(&R) -> CellValue,
{
    let mut keyed: Vec<(CellValue, R)> = rows.into_iter().map(|r| (key(&r), r)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_cells(a, b, direction));
    keyed.into_iter().map(|(_, r)| r).collect()
}

// =============================================================================
// Searching
// =============================================================================

/// Normalizes a search query: trimmed and lowercased, `None` when blank.
pub fn normalize_query(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Case-insensitive substring match of an already-normalized query.
pub fn text_matches(haystack: &str, normalized_query: &str) -> bool {
    haystack.to_lowercase().contains(normalized_query)
}

// =============================================================================
// Pagination
// =============================================================================

/// Number of pages for `total` rows; never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        PageRequest {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, 10)
    }
}

/// One page of results plus the numbers a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Everything on one page (no pagination requested).
    pub fn all(items: Vec<T>) -> Self {
        let total = items.len();
        Page {
            items,
            page: 1,
            page_size: total.max(1),
            total_items: total,
            total_pages: 1,
        }
    }

    /// Maps the items, keeping the page numbers.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Slices `rows` to the requested page, clamping it into `[1, total_pages]`.
pub fn paginate<R>(rows: Vec<R>, request: PageRequest) -> Page<R> {
    let total_items = rows.len();
    let page_size = request.page_size.max(1);
    let total_pages = total_pages(total_items, page_size);
    let page = request.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let items = rows.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
