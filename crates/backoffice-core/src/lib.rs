//! # backoffice-core: Pure Logic for the Back Office
//!
//! Records, money, dates, validation and the generic data table. Nothing in
//! this crate touches storage, the clock or the network; callers pass `today`
//! in where a date matters.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Back Office Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/backoffice (pages)                      │   │
//! │  │   inventory • orders • customers • calendar • dashboard         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ backoffice-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  dates  │ │validation│ │ table  │  │   │
//! │  │   │ Order   │ │  Money  │ │DateRange│ │FieldErrs │ │DataTbl │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │          changes (field diffs) • query (filter/sort/page)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            backoffice-store (repositories, history)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (InventoryItem, Order, Customer, Reminder) and enums
//! - [`money`] - Integer money in minor units
//! - [`dates`] - DD-MM-YYYY handling and the date-range picker
//! - [`validation`] - Field validators and the form accumulator
//! - [`changes`] - Field-level diffs for edit history
//! - [`query`] - Filter, sort and paginate helpers
//! - [`table`] - The generic data table
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::table::{Column, DataTable};
//! use backoffice_core::{Customer, CustomerStatus, Money};
//!
//! let customers = vec![Customer {
//!     id: "c1".to_string(),
//!     name: "Ayesha Khan".to_string(),
//!     email: "ayesha@example.com".to_string(),
//!     phone: "0300-1234567".to_string(),
//!     address: "Gulberg, Lahore".to_string(),
//!     total_orders: 4,
//!     total_spent: Money::from_major(12_000),
//!     status: CustomerStatus::Vip,
//!     favorite_category: "Electronics".to_string(),
//! }];
//!
//! let mut table = DataTable::new(
//!     customers,
//!     vec![Column::new("name", "Name", |c: &Customer| c.name.as_str().into()).sortable()],
//! );
//! table.set_query("ayesha");
//! assert_eq!(table.visible_rows().len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod changes;
pub mod dates;
pub mod error;
pub mod money;
pub mod query;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use changes::{diff, FieldChange};
pub use dates::{validate_date_range, DateRange, DateRangePicker, DateRangePreset};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::Money;
pub use query::{CellValue, Page, PageRequest, SortDirection};
pub use table::DataTable;
pub use types::*;
