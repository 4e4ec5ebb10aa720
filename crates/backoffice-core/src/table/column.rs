//! Column, action and option definitions a page hands to a [`DataTable`].
//!
//! [`DataTable`]: super::DataTable

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::query::CellValue;

pub(crate) type Accessor<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;
pub(crate) type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

// =============================================================================
// Column
// =============================================================================

/// One column of a data table.
///
/// Columns are searchable unless opted out and sortable only when opted in.
///
/// ```rust
/// use backoffice_core::table::{Align, Column};
/// use backoffice_core::InventoryItem;
///
/// let stock: Column<InventoryItem> =
///     Column::new("current_stock", "Stock", |item: &InventoryItem| item.current_stock.into())
///         .sortable()
///         .align(Align::Right)
///         .width("90px");
/// assert!(stock.is_sortable());
/// ```
pub struct Column<T> {
    key: String,
    header: String,
    accessor: Accessor<T>,
    sortable: bool,
    searchable: bool,
    width: Option<String>,
    align: Align,
}

impl<T> Column<T> {
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&T) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Column {
            key: key.into(),
            header: header.into(),
            accessor: Box::new(accessor),
            sortable: false,
            searchable: true,
            width: None,
            align: Align::Left,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn width_hint(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn alignment(&self) -> Align {
        self.align
    }

    /// Runs the accessor.
    pub fn value(&self, item: &T) -> CellValue {
        (self.accessor)(item)
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

// =============================================================================
// Actions
// =============================================================================

/// A per-row action ("Edit", "Mark Paid", ...).
///
/// The optional condition hides the action for rows it does not apply to.
pub struct RowAction<T> {
    key: String,
    label: String,
    condition: Option<Predicate<T>>,
}

impl<T> RowAction<T> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        RowAction {
            key: key.into(),
            label: label.into(),
            condition: None,
        }
    }

    /// Only offer the action for rows matching `condition`.
    pub fn when(mut self, condition: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_available(&self, item: &T) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition(item))
    }
}

impl<T> std::fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowAction")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// An action applied to every selected row at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAction {
    pub key: String,
    pub label: String,
}

impl BulkAction {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        BulkAction {
            key: key.into(),
            label: label.into(),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Page sizes offered by the page-size dropdown.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Feature switches and presentation defaults for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub searchable: bool,
    pub paginated: bool,
    pub selectable: bool,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Placeholder rows rendered while loading.
    pub skeleton_rows: usize,
    /// Message for an empty table with no search active.
    pub empty_message: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            searchable: true,
            paginated: true,
            selectable: false,
            page_size: 10,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            skeleton_rows: 5,
            empty_message: "No data available".to_string(),
        }
    }
}
