//! # Generic Data Table
//!
//! Renders any homogeneous record list as an interactive table without
//! page-specific logic. Orders, inventory, customers and reminders all use it.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page supplies: data: Vec<T>, columns: Vec<Column<T>>, TableOptions    │
//! │                                │                                        │
//! │                                ▼                                        │
//! │   ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────────┐     │
//! │   │  search  │──► │   sort   │──► │ paginate │──► │   render()   │     │
//! │   │ (query)  │    │ (1 key)  │    │ (page,   │    │  TableView   │     │
//! │   └──────────┘    └──────────┘    │  size)   │    └──────────────┘     │
//! │                                   └──────────┘                          │
//! │                                                                         │
//! │  Interaction state kept here: query, sort, page, page size, selection. │
//! │  Loading / error flags come from the page and override the rows.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline always starts from `data`, so applying the same query twice
//! yields the same rows.
//!
//! ## Selection Ownership
//! Selection lives in the table unless the page installs a handler with
//! [`DataTable::on_selection_change`]. With a handler, the table only proposes
//! the next selection and the page pushes back what it accepted through
//! [`DataTable::sync_selection`].

mod column;
mod view;

use std::collections::BTreeSet;

pub use column::{Align, BulkAction, Column, RowAction, TableOptions, DEFAULT_PAGE_SIZE_OPTIONS};
pub use view::{
    ActionInvocation, ActionItem, ActionsView, BulkBar, BulkInvocation, HeaderCell, PageInfo,
    RenderedRow, SelectAllState, TableBody, TableView,
};

use crate::error::{CoreError, CoreResult};
use crate::query::{normalize_query, sort_rows, text_matches, total_pages, SortDirection};
use crate::types::Entity;

type SearchKey<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type SelectionHandler = Box<dyn FnMut(&BTreeSet<String>) + Send>;

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

// =============================================================================
// Data Table
// =============================================================================

pub struct DataTable<T: Entity> {
    data: Vec<T>,
    columns: Vec<Column<T>>,
    options: TableOptions,
    search_key: Option<SearchKey<T>>,
    row_actions: Vec<RowAction<T>>,
    bulk_actions: Vec<BulkAction>,

    query: String,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
    selected: BTreeSet<String>,
    on_selection_change: Option<SelectionHandler>,

    loading: bool,
    error: Option<String>,
}

impl<T: Entity> DataTable<T> {
    pub fn new(data: Vec<T>, columns: Vec<Column<T>>) -> Self {
        let options = TableOptions::default();
        DataTable {
            data,
            columns,
            page_size: options.page_size,
            options,
            search_key: None,
            row_actions: Vec::new(),
            bulk_actions: Vec::new(),
            query: String::new(),
            sort: None,
            page: 1,
            selected: BTreeSet::new(),
            on_selection_change: None,
            loading: false,
            error: None,
        }
    }

    /// A `page_size` missing from `page_size_options` falls back to the
    /// first listed option.
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.page_size = if options.page_size_options.contains(&options.page_size) {
            options.page_size
        } else {
            options
                .page_size_options
                .first()
                .copied()
                .unwrap_or(options.page_size)
        }
        .max(1);
        self.options = options;
        self.page = 1;
        self
    }

    /// Searches this text instead of scanning the searchable columns.
    pub fn with_search_key(mut self, key: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.search_key = Some(Box::new(key));
        self
    }

    pub fn with_row_action(mut self, action: RowAction<T>) -> Self {
        self.row_actions.push(action);
        self
    }

    pub fn with_bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Lifts selection out of the table; see the module docs.
    pub fn on_selection_change(
        mut self,
        handler: impl FnMut(&BTreeSet<String>) + Send + 'static,
    ) -> Self {
        self.on_selection_change = Some(Box::new(handler));
        self
    }

    // =========================================================================
    // Data & Presentational State
    // =========================================================================

    /// Replaces the records, dropping selections of rows that disappeared.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        let present: BTreeSet<&str> = self.data.iter().map(|item| item.id()).collect();
        self.selected.retain(|id| present.contains(id.as_str()));
        self.page = self.page();
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Sets the search text and returns to page 1.
    ///
    /// Ignored when searching is disabled.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        if !self.options.searchable {
            return false;
        }
        self.query = query.into();
        self.page = 1;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn active_query(&self) -> Option<String> {
        if self.options.searchable {
            normalize_query(&self.query)
        } else {
            None
        }
    }

    fn matches(&self, item: &T, query: &str) -> bool {
        match &self.search_key {
            Some(key) => text_matches(&key(item), query),
            None => self
                .columns
                .iter()
                .filter(|c| c.is_searchable())
                .any(|c| text_matches(&c.value(item).to_string(), query)),
        }
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Header click: a new column sorts ascending, the active column flips.
    ///
    /// Returns false (and changes nothing) for unknown or non-sortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key() == key && c.is_sortable());
        if !sortable {
            return false;
        }

        self.sort = match self.sort.take() {
            Some(current) if current.key == key => Some(SortState {
                key: current.key,
                direction: current.direction.toggled(),
            }),
            _ => Some(SortState {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
        true
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Every row that passes the search, in display order.
    pub fn visible_rows(&self) -> Vec<&T> {
        let rows: Vec<&T> = match self.active_query() {
            Some(query) => self
                .data
                .iter()
                .filter(|item| self.matches(item, &query))
                .collect(),
            None => self.data.iter().collect(),
        };

        let column = self.sort.as_ref().and_then(|sort| {
            self.columns
                .iter()
                .find(|c| c.key() == sort.key)
                .map(|c| (c, sort.direction))
        });

        match column {
            Some((column, direction)) => sort_rows(rows, |item| column.value(item), direction),
            None => rows,
        }
    }

    fn total_pages_for(&self, total_rows: usize) -> usize {
        if self.options.paginated {
            total_pages(total_rows, self.page_size)
        } else {
            1
        }
    }

    /// The requested page, kept inside the current page count.
    fn effective_page(&self, total_rows: usize) -> usize {
        self.page.clamp(1, self.total_pages_for(total_rows))
    }

    /// Rows shown on the current page (all rows when pagination is off).
    pub fn current_page_rows(&self) -> Vec<&T> {
        let rows = self.visible_rows();
        if !self.options.paginated {
            return rows;
        }

        let page = self.effective_page(rows.len());
        rows.into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn page(&self) -> usize {
        self.effective_page(self.visible_rows().len())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages_for(self.visible_rows().len())
    }

    /// Moves to `page`; requests outside `[1, total_pages]` are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if !self.options.paginated || page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        let next = self.page() + 1;
        self.go_to_page(next)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.page().checked_sub(1) {
            Some(previous) => self.go_to_page(previous),
            None => false,
        }
    }

    /// Picks a size from the option list and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> CoreResult<()> {
        if !self.options.page_size_options.contains(&page_size) {
            return Err(CoreError::PageSizeNotAllowed {
                requested: page_size,
                allowed: self.options.page_size_options.clone(),
            });
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        if !self.options.paginated {
            return None;
        }

        let total_rows = self.visible_rows().len();
        let total_pages = self.total_pages_for(total_rows);
        let page = self.effective_page(total_rows);
        let (first_row, last_row) = if total_rows == 0 {
            (0, 0)
        } else {
            let first = (page - 1) * self.page_size + 1;
            (first, (page * self.page_size).min(total_rows))
        };

        Some(PageInfo {
            page,
            page_size: self.page_size,
            total_pages,
            total_rows,
            first_row,
            last_row,
            has_previous: page > 1,
            has_next: page < total_pages,
        })
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Pushes a selection decided outside the table (lifted selection).
    pub fn sync_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    /// Checkbox on one row.
    pub fn toggle_row(&mut self, id: &str) -> bool {
        if !self.options.selectable || !self.data.iter().any(|item| item.id() == id) {
            return false;
        }

        let mut next = self.selected.clone();
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        self.propose_selection(next);
        true
    }

    /// Header checkbox: selects every row of the current page, or clears
    /// exactly those rows when they are all selected already.
    pub fn toggle_select_all(&mut self) -> bool {
        if !self.options.selectable {
            return false;
        }

        let page_ids: Vec<String> = self
            .current_page_rows()
            .into_iter()
            .map(|item| item.id().to_string())
            .collect();
        if page_ids.is_empty() {
            return false;
        }

        let mut next = self.selected.clone();
        if page_ids.iter().all(|id| next.contains(id)) {
            for id in &page_ids {
                next.remove(id);
            }
        } else {
            next.extend(page_ids);
        }
        self.propose_selection(next);
        true
    }

    pub fn clear_selection(&mut self) {
        self.propose_selection(BTreeSet::new());
    }

    fn propose_selection(&mut self, next: BTreeSet<String>) {
        match self.on_selection_change.as_mut() {
            Some(handler) => handler(&next),
            None => self.selected = next,
        }
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let page_rows = self.current_page_rows();
        let selected = page_rows
            .iter()
            .filter(|item| self.selected.contains(item.id()))
            .count();

        if selected == 0 {
            SelectAllState::None
        } else if selected == page_rows.len() {
            SelectAllState::All
        } else {
            SelectAllState::Partial
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// One action → a button (if its condition passes); several → a menu of
    /// the ones that apply.
    pub fn actions_for(&self, item: &T) -> ActionsView {
        match self.row_actions.as_slice() {
            [] => ActionsView::None,
            [only] => {
                if only.is_available(item) {
                    ActionsView::Button(action_item(only))
                } else {
                    ActionsView::None
                }
            }
            many => {
                let items: Vec<ActionItem> = many
                    .iter()
                    .filter(|a| a.is_available(item))
                    .map(action_item)
                    .collect();
                if items.is_empty() {
                    ActionsView::None
                } else {
                    ActionsView::Menu { items }
                }
            }
        }
    }

    /// Resolves a click on a row action into an invocation for the page.
    pub fn trigger_action(&self, row_id: &str, action: &str) -> Option<ActionInvocation> {
        let item = self.data.iter().find(|item| item.id() == row_id)?;
        let action = self.row_actions.iter().find(|a| a.key() == action)?;
        if !action.is_available(item) {
            return None;
        }

        Some(ActionInvocation {
            action: action.key().to_string(),
            row_id: row_id.to_string(),
        })
    }

    /// The bulk-action bar, shown while at least one row is selected.
    pub fn bulk_bar(&self) -> Option<BulkBar> {
        if self.selected.is_empty() {
            return None;
        }

        Some(BulkBar {
            selected_count: self.selected.len(),
            actions: self
                .bulk_actions
                .iter()
                .map(|a| ActionItem {
                    key: a.key.clone(),
                    label: a.label.clone(),
                })
                .collect(),
        })
    }

    pub fn trigger_bulk(&self, action: &str) -> Option<BulkInvocation> {
        if self.selected.is_empty() {
            return None;
        }
        let action = self.bulk_actions.iter().find(|a| a.key == action)?;

        Some(BulkInvocation {
            action: action.key.clone(),
            row_ids: self.selected_ids(),
        })
    }

    // =========================================================================
    // Render
    // =========================================================================

    pub fn headers(&self) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key().to_string(),
                header: c.header().to_string(),
                sortable: c.is_sortable(),
                sorted: self
                    .sort
                    .as_ref()
                    .filter(|s| s.key == c.key())
                    .map(|s| s.direction),
                width: c.width_hint().map(str::to_string),
                align: c.alignment(),
            })
            .collect()
    }

    fn empty_message(&self) -> String {
        if self.active_query().is_some() {
            format!("No results found for \"{}\"", self.query.trim())
        } else {
            self.options.empty_message.clone()
        }
    }

    pub fn render(&self) -> TableView {
        let body = if self.loading {
            TableBody::Loading {
                skeleton_rows: self.options.skeleton_rows,
            }
        } else if let Some(message) = &self.error {
            TableBody::Error {
                message: message.clone(),
            }
        } else {
            let rows = self.current_page_rows();
            if rows.is_empty() {
                TableBody::Empty {
                    message: self.empty_message(),
                }
            } else {
                TableBody::Rows {
                    rows: rows.into_iter().map(|item| self.render_row(item)).collect(),
                }
            }
        };

        TableView {
            headers: self.headers(),
            body,
            query: self.query.clone(),
            pagination: self.page_info(),
            select_all: self.options.selectable.then(|| self.select_all_state()),
            bulk_bar: self.bulk_bar(),
        }
    }

    fn render_row(&self, item: &T) -> RenderedRow {
        RenderedRow {
            id: item.id().to_string(),
            cells: self
                .columns
                .iter()
                .map(|c| c.value(item).to_string())
                .collect(),
            selected: self.selected.contains(item.id()),
            actions: self.actions_for(item),
        }
    }
}

fn action_item<T>(action: &RowAction<T>) -> ActionItem {
    ActionItem {
        key: action.key().to_string(),
        label: action.label().to_string(),
    }
}

impl<T: Entity> std::fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.data.len())
            .field("columns", &self.columns)
            .field("query", &self.query)
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("selected", &self.selected.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Row {
        id: String,
        name: String,
        city: String,
        score: Option<i64>,
    }

    impl Entity for Row {
        const KIND: &'static str = "Row";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(i: usize, name: &str, city: &str, score: Option<i64>) -> Row {
        Row {
            id: format!("r{:02}", i),
            name: name.to_string(),
            city: city.to_string(),
            score,
        }
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name", |r: &Row| r.name.as_str().into()).sortable(),
            Column::new("city", "City", |r: &Row| r.city.as_str().into()),
            Column::new("score", "Score", |r: &Row| r.score.into())
                .sortable()
                .searchable(false),
            Column::new("id", "Id", |r: &Row| r.id.as_str().into()).searchable(false),
        ]
    }

    fn numbered(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| row(i, &format!("Item {:02}", i), "Lahore", Some(i as i64)))
            .collect()
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_search_counts_matching_rows_case_insensitively() {
        let data = vec![
            row(0, "Ayesha Khan", "Lahore", Some(5)),
            row(1, "Bilal Ahmed", "Karachi", Some(3)),
            row(2, "Sana Tariq", "LAHORE", None),
            row(3, "Omar Farooq", "Islamabad", Some(9)),
        ];
        let mut table = DataTable::new(data, columns());

        assert!(table.set_query("lahore"));
        assert_eq!(table.visible_rows().len(), 2);

        // The non-searchable score column is not scanned.
        table.set_query("9");
        assert!(table.visible_rows().is_empty());
    }

    #[test]
    fn test_same_query_twice_yields_same_rows() {
        let mut table = DataTable::new(numbered(30), columns());
        table.set_query("item 1");
        let first = names(&table.visible_rows());
        table.set_query("item 1");
        let second = names(&table.visible_rows());

        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn test_search_key_overrides_columns() {
        let data = vec![
            row(0, "Ayesha", "Lahore", None),
            row(1, "Bilal", "Karachi", None),
        ];
        let mut table = DataTable::new(data, columns()).with_search_key(|r: &Row| r.id.clone());

        table.set_query("lahore");
        assert!(table.visible_rows().is_empty());
        table.set_query("R01");
        assert_eq!(names(&table.visible_rows()), vec!["Bilal"]);
    }

    #[test]
    fn test_sort_toggle_with_missing_values_last() {
        let data = vec![
            row(0, "c", "x", Some(2)),
            row(1, "a", "x", None),
            row(2, "b", "x", Some(1)),
            row(3, "d", "x", Some(3)),
        ];
        let mut table = DataTable::new(data, columns());

        assert!(table.toggle_sort("score"));
        assert_eq!(names(&table.visible_rows()), vec!["b", "c", "d", "a"]);

        assert!(table.toggle_sort("score"));
        assert_eq!(
            table.sort_state().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(names(&table.visible_rows()), vec!["d", "c", "b", "a"]);

        // Switching columns starts ascending again.
        assert!(table.toggle_sort("name"));
        assert_eq!(names(&table.visible_rows()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_non_sortable_header_is_ignored() {
        let mut table = DataTable::new(numbered(3), columns());
        assert!(!table.toggle_sort("city"));
        assert!(!table.toggle_sort("missing"));
        assert!(table.sort_state().is_none());
    }

    #[test]
    fn test_pagination_slices_25_rows() {
        let mut table = DataTable::new(numbered(25), columns());
        assert_eq!(table.page_size(), 10);
        assert_eq!(table.total_pages(), 3);

        let page_one = names(&table.current_page_rows());
        assert_eq!(page_one.first().map(String::as_str), Some("Item 00"));
        assert_eq!(page_one.len(), 10);

        assert!(table.go_to_page(3));
        let page_three = names(&table.current_page_rows());
        assert_eq!(page_three.len(), 5);
        assert_eq!(page_three.first().map(String::as_str), Some("Item 20"));

        let info = table.page_info().unwrap();
        assert_eq!((info.first_row, info.last_row), (21, 25));
        assert!(!info.has_next);

        assert!(!table.go_to_page(4));
        assert!(!table.go_to_page(0));
        assert!(!table.next_page());
        assert_eq!(table.page(), 3);

        assert!(table.previous_page());
        assert!(table.previous_page());
        assert_eq!(table.page(), 1);
        assert!(!table.previous_page());
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_unlisted_page_size_falls_back_to_first_option() {
        let options = TableOptions {
            page_size: 7,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(25), columns()).with_options(options);
        assert_eq!(table.page_size(), DEFAULT_PAGE_SIZE_OPTIONS[0]);

        let options = TableOptions {
            page_size: 25,
            ..TableOptions::default()
        };
        table = table.with_options(options);
        assert_eq!(table.page_size(), 25);
        assert_eq!(table.total_pages(), 1);
    }

    #[test]
    fn test_page_size_change_resets_to_first_page() {
        let mut table = DataTable::new(numbered(60), columns());
        table.go_to_page(4);
        table.set_page_size(25).unwrap();

        assert_eq!(table.page(), 1);
        assert_eq!(table.total_pages(), 3);
        assert!(matches!(
            table.set_page_size(7),
            Err(CoreError::PageSizeNotAllowed { requested: 7, .. })
        ));
        assert_eq!(table.page_size(), 25);
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut table = DataTable::new(numbered(25), columns());
        table.go_to_page(3);
        table.set_query("item");
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_select_all_scopes_to_current_page() {
        let options = TableOptions {
            selectable: true,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(25), columns()).with_options(options);

        table.toggle_row("r00");
        table.go_to_page(2);

        assert!(table.toggle_select_all());
        assert_eq!(table.select_all_state(), SelectAllState::All);
        // Page 2 rows plus the row picked on page 1.
        assert_eq!(table.selected_ids().len(), 11);
        assert!(table.is_selected("r10"));
        assert!(!table.is_selected("r20"));

        assert!(table.toggle_select_all());
        assert_eq!(table.selected_ids(), vec!["r00".to_string()]);
        assert_eq!(table.select_all_state(), SelectAllState::None);

        table.clear_selection();
        assert!(table.selected_ids().is_empty());
        assert!(table.bulk_bar().is_none());
    }

    #[test]
    fn test_partial_page_selection_completes_on_select_all() {
        let options = TableOptions {
            selectable: true,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(5), columns()).with_options(options);
        table.toggle_row("r01");
        assert_eq!(table.select_all_state(), SelectAllState::Partial);

        table.toggle_select_all();
        assert_eq!(table.selected_ids().len(), 5);
    }

    #[test]
    fn test_selection_ignored_when_not_selectable() {
        let mut table = DataTable::new(numbered(5), columns());
        assert!(!table.toggle_row("r01"));
        assert!(!table.toggle_select_all());
        assert!(table.render().select_all.is_none());
    }

    #[test]
    fn test_lifted_selection_goes_through_handler() {
        let proposed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&proposed);
        let options = TableOptions {
            selectable: true,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(3), columns())
            .with_options(options)
            .on_selection_change(move |ids| sink.lock().unwrap().push(ids.len()));

        table.toggle_select_all();
        assert_eq!(*proposed.lock().unwrap(), vec![3]);
        // The caller owns the selection until it syncs it back.
        assert!(table.selected_ids().is_empty());

        table.sync_selection(["r00", "r02"]);
        assert_eq!(table.bulk_bar().map(|b| b.selected_count), Some(2));

        table.clear_selection();
        assert_eq!(*proposed.lock().unwrap(), vec![3, 0]);
        assert_eq!(table.selected_ids().len(), 2);
    }

    #[test]
    fn test_single_action_button_respects_condition() {
        let data = vec![row(0, "a", "x", Some(1)), row(1, "b", "x", None)];
        let table = DataTable::new(data, columns())
            .with_row_action(RowAction::new("score", "Score it").when(|r: &Row| r.score.is_none()));

        assert_eq!(table.actions_for(&table.data()[0]), ActionsView::None);
        assert!(matches!(
            table.actions_for(&table.data()[1]),
            ActionsView::Button(ActionItem { ref key, .. }) if key == "score"
        ));
        assert!(table.trigger_action("r00", "score").is_none());
        assert_eq!(
            table.trigger_action("r01", "score"),
            Some(ActionInvocation {
                action: "score".to_string(),
                row_id: "r01".to_string(),
            })
        );
    }

    #[test]
    fn test_multiple_actions_render_as_menu() {
        let table = DataTable::new(numbered(1), columns())
            .with_row_action(RowAction::new("edit", "Edit"))
            .with_row_action(RowAction::new("archive", "Archive").when(|_: &Row| false))
            .with_row_action(RowAction::new("delete", "Delete"));

        match table.actions_for(&table.data()[0]) {
            ActionsView::Menu { items } => {
                let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
                assert_eq!(keys, vec!["edit", "delete"]);
            }
            other => panic!("expected menu, got {:?}", other),
        }
    }

    #[test]
    fn test_bulk_bar_appears_with_selection() {
        let options = TableOptions {
            selectable: true,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(3), columns())
            .with_options(options)
            .with_bulk_action(BulkAction::new("delete", "Delete selected"));

        assert!(table.bulk_bar().is_none());
        assert!(table.trigger_bulk("delete").is_none());

        table.toggle_row("r02");
        table.toggle_row("r01");
        let bar = table.bulk_bar().unwrap();
        assert_eq!(bar.selected_count, 2);
        assert_eq!(
            table.trigger_bulk("delete").map(|b| b.row_ids),
            Some(vec!["r01".to_string(), "r02".to_string()])
        );
    }

    #[test]
    fn test_presentational_states() {
        let mut table = DataTable::new(Vec::<Row>::new(), columns());
        assert_eq!(
            table.render().body,
            TableBody::Empty {
                message: "No data available".to_string()
            }
        );

        table.set_data(numbered(3));
        table.set_query("zzz");
        assert_eq!(
            table.render().body,
            TableBody::Empty {
                message: "No results found for \"zzz\"".to_string()
            }
        );

        table.set_error(Some("Could not load orders".to_string()));
        assert!(matches!(table.render().body, TableBody::Error { .. }));

        table.set_loading(true);
        assert_eq!(table.render().body, TableBody::Loading { skeleton_rows: 5 });
    }

    #[test]
    fn test_render_rows_and_headers() {
        let mut table = DataTable::new(numbered(2), columns());
        table.toggle_sort("name");
        table.toggle_sort("name");
        let view = table.render();

        assert_eq!(view.headers[0].sorted, Some(SortDirection::Descending));
        assert_eq!(view.headers[1].sorted, None);
        match view.body {
            TableBody::Rows { rows } => {
                assert_eq!(rows[0].cells, vec!["Item 01", "Lahore", "1", "r01"]);
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_set_data_prunes_selection_and_clamps_page() {
        let options = TableOptions {
            selectable: true,
            ..TableOptions::default()
        };
        let mut table = DataTable::new(numbered(25), columns()).with_options(options);
        table.go_to_page(3);
        table.toggle_row("r24");

        table.set_data(numbered(12));
        assert!(table.selected_ids().is_empty());
        assert_eq!(table.page(), 2);
        assert_eq!(table.current_page_rows().len(), 2);
    }
}
