//! # Page Commands
//!
//! One module per back office page. Every page follows the same shape:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create  → validate form (FieldErrors) → repo.create → history Created │
//! │  update  → validate form → repo.update → diff → history Updated        │
//! │  delete  → (reason) → repo.remove → history Deleted with snapshot      │
//! │  list    → search + facets → sort (key, direction) → page              │
//! │  table   → DataTable columns and row actions for the page              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take the state they need by reference and return
//! `Result<T, ApiError>`.

pub mod calendar;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod orders;

use serde::{Deserialize, Serialize};

use backoffice_core::query::normalize_query;
use backoffice_core::validation::{validate_search_query, FormValidator};
use backoffice_core::{CellValue, FieldErrors, SortDirection};
use backoffice_store::ListQuery;

use crate::error::ApiError;

/// Column a page list is sorted by, plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<K> {
    pub key: K,
    #[serde(default)]
    pub direction: SortDirection,
}

impl<K> SortSpec<K> {
    pub fn ascending(key: K) -> Self {
        SortSpec {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: K) -> Self {
        SortSpec {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// A sortable field of one record type.
pub trait SortField<T>: Copy + Send + Sync + 'static {
    fn value(self, record: &T) -> CellValue;
}

/// Adds the optional sort to a list query.
pub(crate) fn with_sort<T, K>(query: ListQuery<T>, sort: Option<SortSpec<K>>) -> ListQuery<T>
where
    K: SortField<T>,
{
    match sort {
        Some(spec) => query.sort_by(move |record| spec.key.value(record), spec.direction),
        None => query,
    }
}

/// Adds a case-insensitive text search over `haystack`.
///
/// Blank searches match everything; over-long ones are rejected.
pub(crate) fn with_search<T: 'static>(
    query: ListQuery<T>,
    search: &str,
    haystack: fn(&T) -> String,
) -> Result<ListQuery<T>, ApiError> {
    let search = validate_search_query(search).map_err(FieldErrors::from)?;

    Ok(match normalize_query(&search) {
        Some(needle) => query.filter(move |record| haystack(record).to_lowercase().contains(&needle)),
        None => query,
    })
}

/// Blank reasons count as no reason.
pub(crate) fn optional_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

/// Returns the first error collected by a form, or the parsed value.
///
/// Parsed pieces are `None` only when the form recorded an error for them.
pub(crate) fn finish_form<V>(
    form: FormValidator,
    parsed: Option<V>,
) -> Result<V, FieldErrors> {
    match (form.finish(), parsed) {
        (Ok(()), Some(value)) => Ok(value),
        (result, _) => Err(result.err().unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::validation::parse_quantity;

    #[derive(Debug, Clone)]
    struct Row {
        name: &'static str,
    }

    #[test]
    fn test_optional_reason_trims_blank() {
        assert_eq!(optional_reason(Some("  ".to_string())), None);
        assert_eq!(optional_reason(Some(" damaged ".to_string())), Some("damaged".to_string()));
        assert_eq!(optional_reason(None), None);
    }

    #[test]
    fn test_with_search_matches_case_insensitively() {
        let rows = vec![Row { name: "Green Tea" }, Row { name: "Rice" }];
        let query = with_search(ListQuery::new(), " TEA ", |r: &Row| r.name.to_string()).unwrap();
        assert_eq!(query.apply(rows).items.len(), 1);
    }

    #[test]
    fn test_with_search_rejects_long_query() {
        let long = "x".repeat(500);
        let err = with_search(ListQuery::<Row>::new(), &long, |r: &Row| r.name.to_string())
            .unwrap_err();
        assert!(err.field("query").is_some());
    }

    #[test]
    fn test_finish_form_reports_errors() {
        let mut form = FormValidator::new();
        let qty = form.value(parse_quantity("quantity", "many"));
        let err = finish_form(form, qty).unwrap_err();
        assert_eq!(err.get("quantity"), Some("quantity must be a number"));
    }
}
