//! Serializable snapshot of a table, ready for the dashboard to draw.

use serde::Serialize;

use super::column::Align;
use crate::query::SortDirection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    /// Direction arrow when this column is the active sort key.
    pub sorted: Option<SortDirection>,
    pub width: Option<String>,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub key: String,
    pub label: String,
}

/// How a row's actions are presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionsView {
    None,
    Button(ActionItem),
    Menu { items: Vec<ActionItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub actions: ActionsView,
}

/// State of the header checkbox for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllState {
    None,
    Partial,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// 1-based index of the first row shown, 0 when there are none.
    pub first_row: usize,
    /// 1-based index of the last row shown, 0 when there are none.
    pub last_row: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkBar {
    pub selected_count: usize,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableBody {
    Loading { skeleton_rows: usize },
    Error { message: String },
    Empty { message: String },
    Rows { rows: Vec<RenderedRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
    pub query: String,
    pub pagination: Option<PageInfo>,
    pub select_all: Option<SelectAllState>,
    pub bulk_bar: Option<BulkBar>,
}

/// What the caller should do after a row action was clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInvocation {
    pub action: String,
    pub row_id: String,
}

/// What the caller should do after a bulk action was clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkInvocation {
    pub action: String,
    pub row_ids: Vec<String>,
}
