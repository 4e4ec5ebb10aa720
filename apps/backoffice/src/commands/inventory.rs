//! # Inventory Commands
//!
//! Product CRUD, stock adjustments and the inventory table.
//!
//! ## Stock Adjustment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Adjust Stock dialog: [in|out]  quantity [ 12 ]  reason [ ... ]        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_quantity + reason required ──── FieldErrors ──► dialog          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  out > stock or in > room left? ────── "quantity cannot exceed N"      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stock ± qty, this week's in/out += qty, total_value recomputed        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repo.update → history Updated (reason attached)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a product always needs a reason; the removed product is kept as
//! a snapshot in the history log.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use backoffice_core::table::{Align, Column, RowAction};
use backoffice_core::validation::{
    parse_count, parse_price, parse_quantity, validate_name, validate_required, validate_sku,
    FormValidator, MAX_QUANTITY,
};
use backoffice_core::{
    new_id, CellValue, DataTable, FieldErrors, InventoryItem, Money, Page, PageRequest,
    SortDirection, StockMovements, StockStatus, ValidationError,
};
use backoffice_store::ListQuery;

use super::{finish_form, optional_reason, with_search, with_sort, SortField, SortSpec};
use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySortKey {
    Name,
    Sku,
    Category,
    CurrentStock,
    CostPrice,
    SellingPrice,
    TotalValue,
}

impl SortField<InventoryItem> for InventorySortKey {
    fn value(self, item: &InventoryItem) -> CellValue {
        match self {
            InventorySortKey::Name => item.name.to_lowercase().into(),
            InventorySortKey::Sku => item.sku.as_str().into(),
            InventorySortKey::Category => item.category.as_str().into(),
            InventorySortKey::CurrentStock => item.current_stock.into(),
            InventorySortKey::CostPrice => item.cost_price.into(),
            InventorySortKey::SellingPrice => item.selling_price.into(),
            InventorySortKey::TotalValue => item.total_value.into(),
        }
    }
}

/// Inventory page filters.
///
/// `category` and `stock_status` are the two dropdown facets; `None` means
/// "All".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryQuery {
    pub search: String,
    pub category: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub sort: Option<SortSpec<InventorySortKey>>,
    pub page: Option<PageRequest>,
}

/// Lists products matching the search and facets.
///
/// The search covers name, SKU and category.
pub async fn list_products(
    store: &StoreState,
    query: InventoryQuery,
) -> Result<Page<InventoryItem>, ApiError> {
    let mut list = with_search(ListQuery::new(), &query.search, |item: &InventoryItem| {
        format!("{} {} {}", item.name, item.sku, item.category)
    })?;

    if let Some(category) = query.category.filter(|c| !c.trim().is_empty()) {
        list = list.filter(move |item| item.category.eq_ignore_ascii_case(category.trim()));
    }
    if let Some(status) = query.stock_status {
        list = list.filter(move |item| item.stock_status() == status);
    }

    list = with_sort(list, query.sort);
    if let Some(page) = query.page {
        list = list.page(page);
    }

    Ok(store.inventory.list(list).await?)
}

pub async fn get_product(store: &StoreState, id: &str) -> Result<InventoryItem, ApiError> {
    Ok(store.inventory.require(id).await?)
}

/// Products at or below their reorder level, emptiest first.
pub async fn low_stock(store: &StoreState) -> Result<Vec<InventoryItem>, ApiError> {
    let query = ListQuery::new()
        .filter(|item: &InventoryItem| item.stock_status() != StockStatus::InStock)
        .sort_by(|item| item.current_stock.into(), SortDirection::Ascending);

    Ok(store.inventory.list(query).await?.items)
}

/// Distinct categories for the category facet, alphabetically.
pub async fn categories(store: &StoreState) -> Result<Vec<String>, ApiError> {
    let names: BTreeSet<String> = store
        .inventory
        .all()
        .await?
        .into_iter()
        .map(|item| item.category)
        .collect();

    Ok(names.into_iter().collect())
}

// =============================================================================
// Create / Update / Delete
// =============================================================================

/// Add/Edit Product dialog, numbers as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: String,
    pub reorder_level: String,
    pub cost_price: String,
    pub selling_price: String,
}

struct ProductInput {
    name: String,
    sku: String,
    category: String,
    current_stock: i64,
    reorder_level: i64,
    cost_price: Money,
    selling_price: Money,
}

impl ProductForm {
    fn validate(&self) -> Result<ProductInput, FieldErrors> {
        let mut form = FormValidator::new();
        form.check(validate_name("name", &self.name))
            .check(validate_sku(&self.sku))
            .check(validate_required("category", &self.category));

        let current_stock = form.value(parse_count("current_stock", &self.current_stock));
        let reorder_level = form.value(parse_count("reorder_level", &self.reorder_level));
        let cost_price = form.value(parse_price("cost_price", &self.cost_price));
        let selling_price = form.value(parse_price("selling_price", &self.selling_price));

        let parsed = match (current_stock, reorder_level, cost_price, selling_price) {
            (Some(current_stock), Some(reorder_level), Some(cost_price), Some(selling_price)) => {
                Some(ProductInput {
                    name: self.name.trim().to_string(),
                    sku: self.sku.trim().to_uppercase(),
                    category: self.category.trim().to_string(),
                    current_stock,
                    reorder_level,
                    cost_price,
                    selling_price,
                })
            }
            _ => None,
        };

        finish_form(form, parsed)
    }
}

/// Rejects a SKU already used by another product.
async fn ensure_unique_sku(
    store: &StoreState,
    sku: &str,
    except_id: Option<&str>,
) -> Result<(), ApiError> {
    let taken = store
        .inventory
        .all()
        .await?
        .iter()
        .any(|item| item.sku.eq_ignore_ascii_case(sku) && Some(item.id.as_str()) != except_id);

    if taken {
        warn!(sku = %sku, "Rejected duplicate SKU");
        let mut errors = FieldErrors::new();
        errors.insert("sku", format!("SKU {} is already in use", sku));
        return Err(errors.into());
    }
    Ok(())
}

pub async fn create_product(
    store: &StoreState,
    form: ProductForm,
) -> Result<InventoryItem, ApiError> {
    let input = form.validate()?;
    ensure_unique_sku(store, &input.sku, None).await?;

    let mut item = InventoryItem {
        id: new_id(),
        name: input.name,
        sku: input.sku,
        category: input.category,
        current_stock: input.current_stock,
        reorder_level: input.reorder_level,
        cost_price: input.cost_price,
        selling_price: input.selling_price,
        total_value: Money::zero(),
        movements: StockMovements::default(),
    };
    item.recompute_total_value().map_err(FieldErrors::from)?;

    let item = store.inventory.create(item).await?;
    store.history.record_created(&item).await?;

    info!(id = %item.id, sku = %item.sku, "Product created");
    Ok(item)
}

/// Replaces the editable fields of a product. Movements are kept.
pub async fn update_product(
    store: &StoreState,
    id: &str,
    form: ProductForm,
    reason: Option<String>,
) -> Result<InventoryItem, ApiError> {
    let existing = store.inventory.require(id).await?;
    let input = form.validate()?;
    ensure_unique_sku(store, &input.sku, Some(id)).await?;

    let mut updated = InventoryItem {
        name: input.name,
        sku: input.sku,
        category: input.category,
        current_stock: input.current_stock,
        reorder_level: input.reorder_level,
        cost_price: input.cost_price,
        selling_price: input.selling_price,
        ..existing
    };
    updated.recompute_total_value().map_err(FieldErrors::from)?;

    let previous = store.inventory.update(updated.clone()).await?;
    store
        .history
        .record_updated(&previous, &updated, optional_reason(reason))
        .await?;

    info!(id = %updated.id, "Product updated");
    Ok(updated)
}

/// Removes a product. The reason is mandatory.
pub async fn delete_product(
    store: &StoreState,
    id: &str,
    reason: &str,
) -> Result<InventoryItem, ApiError> {
    let Some(reason) = optional_reason(Some(reason.to_string())) else {
        warn!(id = %id, "Product delete rejected without a reason");
        return Err(FieldErrors::from(ValidationError::Required {
            field: "reason".to_string(),
        })
        .into());
    };

    let removed = store.inventory.remove(id).await?;
    store.history.record_deleted(&removed, Some(reason)).await?;

    info!(id = %removed.id, sku = %removed.sku, "Product deleted");
    Ok(removed)
}

// =============================================================================
// Stock Adjustment
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockMovement {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockAdjustment {
    pub movement: StockMovement,
    pub quantity: String,
    pub reason: String,
}

/// Moves stock in or out of a product.
pub async fn adjust_stock(
    store: &StoreState,
    id: &str,
    adjustment: StockAdjustment,
) -> Result<InventoryItem, ApiError> {
    let mut form = FormValidator::new();
    let quantity = form.value(parse_quantity("quantity", &adjustment.quantity));
    form.check(validate_required("reason", &adjustment.reason));
    let quantity = finish_form(form, quantity)?;

    let existing = store.inventory.require(id).await?;
    let mut updated = existing.clone();

    match adjustment.movement {
        StockMovement::In => {
            let room = MAX_QUANTITY.saturating_sub(existing.current_stock).max(0);
            if quantity > room {
                warn!(id = %id, quantity, stock = existing.current_stock, "Stock in exceeds capacity");
                return Err(exceeds_quantity(room));
            }
            updated.current_stock += quantity;
            updated.movements.this_week.inbound =
                updated.movements.this_week.inbound.saturating_add(quantity);
        }
        StockMovement::Out => {
            if quantity > existing.current_stock {
                warn!(id = %id, quantity, stock = existing.current_stock, "Stock out exceeds stock");
                return Err(exceeds_quantity(existing.current_stock));
            }
            updated.current_stock -= quantity;
            updated.movements.this_week.outbound =
                updated.movements.this_week.outbound.saturating_add(quantity);
        }
    }
    updated.recompute_total_value().map_err(|_| {
        FieldErrors::from(ValidationError::TooLarge {
            field: "quantity".to_string(),
        })
    })?;

    store.inventory.update(updated.clone()).await?;
    store
        .history
        .record_updated(&existing, &updated, optional_reason(Some(adjustment.reason)))
        .await?;

    info!(
        id = %updated.id,
        movement = ?adjustment.movement,
        quantity,
        stock = updated.current_stock,
        "Stock adjusted"
    );
    Ok(updated)
}

fn exceeds_quantity(available: i64) -> ApiError {
    FieldErrors::from(ValidationError::Exceeds {
        field: "quantity".to_string(),
        available,
    })
    .into()
}

// =============================================================================
// Table
// =============================================================================

/// Inventory table: name, SKU, category, stock, status, prices and value,
/// with Edit / Adjust Stock / Delete in a row menu.
pub fn inventory_table(items: Vec<InventoryItem>, config: &ConfigState) -> DataTable<InventoryItem> {
    let columns = vec![
        Column::new("name", "Product", |item: &InventoryItem| item.name.as_str().into()).sortable(),
        Column::new("sku", "SKU", |item: &InventoryItem| item.sku.as_str().into())
            .sortable()
            .width("140px"),
        Column::new("category", "Category", |item: &InventoryItem| item.category.as_str().into())
            .sortable(),
        Column::new("current_stock", "Stock", |item: &InventoryItem| item.current_stock.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
        Column::new("status", "Status", |item: &InventoryItem| {
            item.stock_status().to_string().into()
        }),
        Column::new("selling_price", "Price", |item: &InventoryItem| item.selling_price.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
        Column::new("total_value", "Value", |item: &InventoryItem| item.total_value.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
    ];

    DataTable::new(items, columns)
        .with_options(config.table_options())
        .with_row_action(RowAction::new("edit", "Edit"))
        .with_row_action(RowAction::new("adjust_stock", "Adjust Stock"))
        .with_row_action(RowAction::new("delete", "Delete"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::table::ActionsView;
    use backoffice_store::HistoryAction;
    use chrono::NaiveDate;

    fn form(sku: &str, stock: &str, cost: &str) -> ProductForm {
        ProductForm {
            name: "Chickpeas 1kg".to_string(),
            sku: sku.to_string(),
            category: "Grocery".to_string(),
            current_stock: stock.to_string(),
            reorder_level: "5".to_string(),
            cost_price: cost.to_string(),
            selling_price: "650".to_string(),
        }
    }

    fn seeded() -> StoreState {
        StoreState::seeded(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[tokio::test]
    async fn test_create_computes_total_value() {
        let store = StoreState::empty();
        let item = create_product(&store, form("GRC-CHK-1KG", "20", "500")).await.unwrap();

        assert_eq!(item.total_value, Money::from_major(10_000));
        assert_eq!(item.stock_status(), StockStatus::InStock);
        assert_eq!(store.inventory.count().await.unwrap(), 1);

        let history = store.history.for_record("Product", &item.id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::Created);
    }

    #[tokio::test]
    async fn test_create_reports_every_bad_field() {
        let store = StoreState::empty();
        let bad = ProductForm {
            name: String::new(),
            ..form("has space", "-1", "abc")
        };

        let err = create_product(&store, bad).await.unwrap_err();
        assert_eq!(err.field("name"), Some("name is required"));
        assert!(err.field("sku").is_some());
        assert_eq!(err.field("current_stock"), Some("current_stock cannot be negative"));
        assert_eq!(err.field("cost_price"), Some("cost_price must be a number"));
        assert!(store.inventory.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let store = seeded();
        let err = create_product(&store, form("grc-rice-5kg", "1", "1")).await.unwrap_err();
        assert!(err.field("sku").is_some());
    }

    #[tokio::test]
    async fn test_selling_price_edit_logs_one_entry() {
        let store = StoreState::empty();
        let item = create_product(&store, form("GRC-CHK-1KG", "20", "500")).await.unwrap();

        let edit = ProductForm {
            selling_price: "700".to_string(),
            ..form("GRC-CHK-1KG", "20", "500")
        };
        let updated = update_product(&store, &item.id, edit, None).await.unwrap();
        assert_eq!(updated.selling_price, Money::from_major(700));

        let updates: Vec<_> = store
            .history
            .for_record("Product", &item.id)
            .await
            .into_iter()
            .filter(|e| e.action == HistoryAction::Updated)
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].changes.len(), 1);
        assert_eq!(updates[0].changes[0].field, "selling_price");
    }

    #[tokio::test]
    async fn test_update_keeps_own_sku() {
        let store = seeded();
        let edit = ProductForm {
            name: "Basmati Rice 5kg Premium".to_string(),
            sku: "GRC-RICE-5KG".to_string(),
            category: "Grocery".to_string(),
            current_stock: "42".to_string(),
            reorder_level: "10".to_string(),
            cost_price: "1450".to_string(),
            selling_price: "1850".to_string(),
        };
        let updated = update_product(&store, "p-1", edit, Some("rename".into())).await.unwrap();
        assert_eq!(updated.name, "Basmati Rice 5kg Premium");
        assert_eq!(updated.movements.this_week.inbound, 20);
    }

    #[tokio::test]
    async fn test_delete_requires_reason() {
        let store = seeded();
        let err = delete_product(&store, "p-1", "   ").await.unwrap_err();
        assert_eq!(err.field("reason"), Some("reason is required"));
        assert!(store.inventory.get("p-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_keeps_snapshot() {
        let store = seeded();
        let removed = delete_product(&store, "p-1", "Discontinued").await.unwrap();
        assert!(store.inventory.get("p-1").await.unwrap().is_none());

        let entries = store.history.for_record("Product", "p-1").await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, HistoryAction::Deleted);
        assert_eq!(entries[0].reason.as_deref(), Some("Discontinued"));
        assert_eq!(entries[0].snapshot["sku"], removed.sku.as_str());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = seeded();
        let err = delete_product(&store, "p-99", "typo").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_adjust_stock_in_and_out() {
        let store = seeded();
        let before = get_product(&store, "p-2").await.unwrap();

        let after = adjust_stock(
            &store,
            "p-2",
            StockAdjustment {
                movement: StockMovement::In,
                quantity: "10".to_string(),
                reason: "Supplier delivery".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(after.current_stock, before.current_stock + 10);
        assert_eq!(after.movements.this_week.inbound, before.movements.this_week.inbound + 10);
        assert_eq!(after.total_value, after.cost_price.multiply_quantity(after.current_stock));

        let after = adjust_stock(
            &store,
            "p-2",
            StockAdjustment {
                movement: StockMovement::Out,
                quantity: "3".to_string(),
                reason: "Damaged".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(after.current_stock, before.current_stock + 7);

        let entries = store.history.for_record("Product", "p-2").await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].reason.as_deref(), Some("Damaged"));
    }

    #[tokio::test]
    async fn test_adjust_stock_rejects_bad_input() {
        let store = seeded();

        let err = adjust_stock(&store, "p-2", StockAdjustment::default()).await.unwrap_err();
        assert_eq!(err.field("quantity"), Some("quantity is required"));
        assert_eq!(err.field("reason"), Some("reason is required"));

        let err = adjust_stock(
            &store,
            "p-2",
            StockAdjustment {
                movement: StockMovement::Out,
                quantity: "9".to_string(),
                reason: "Sold".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field("quantity"), Some("quantity cannot exceed 8"));
    }

    #[tokio::test]
    async fn test_huge_stock_is_a_field_error() {
        let store = StoreState::empty();

        let err = create_product(&store, form("GRC-CHK-1KG", "9223372036854775807", "500"))
            .await
            .unwrap_err();
        assert_eq!(
            err.field("current_stock"),
            Some("current_stock must be between 0 and 1000000000")
        );

        let err = create_product(&store, form("GRC-CHK-1KG", "1000000000", "1000000000"))
            .await
            .unwrap_err();
        assert_eq!(err.field("current_stock"), Some("current_stock is too large"));
        assert!(store.inventory.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_huge_inbound_adjustment_is_rejected() {
        let store = seeded();
        let before = get_product(&store, "p-2").await.unwrap();

        let inbound = |quantity: &str| StockAdjustment {
            movement: StockMovement::In,
            quantity: quantity.to_string(),
            reason: "Supplier delivery".to_string(),
        };

        let err = adjust_stock(&store, "p-2", inbound("9223372036854775807")).await.unwrap_err();
        assert_eq!(err.field("quantity"), Some("quantity must be between 1 and 1000000000"));

        let err = adjust_stock(&store, "p-2", inbound("1000000000")).await.unwrap_err();
        assert_eq!(err.field("quantity"), Some("quantity cannot exceed 999999992"));

        assert_eq!(get_product(&store, "p-2").await.unwrap(), before);
        assert!(store.history.for_record("Product", "p-2").await.is_empty());
    }

    #[tokio::test]
    async fn test_list_products_facets_and_sort() {
        let store = seeded();

        let grocery = list_products(
            &store,
            InventoryQuery {
                category: Some("grocery".to_string()),
                sort: Some(SortSpec::descending(InventorySortKey::CurrentStock)),
                ..InventoryQuery::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = grocery.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["p-3", "p-1", "p-2"]);

        let out = list_products(
            &store,
            InventoryQuery {
                stock_status: Some(StockStatus::OutOfStock),
                ..InventoryQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(out.total_items, 1);
        assert_eq!(out.items[0].id, "p-4");

        let found = list_products(
            &store,
            InventoryQuery {
                search: "  TEA ".to_string(),
                ..InventoryQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.total_items, 1);
    }

    #[tokio::test]
    async fn test_low_stock_and_categories() {
        let store = seeded();
        let low: Vec<_> = low_stock(&store).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(low, ["p-4", "p-2"]);

        let cats = categories(&store).await.unwrap();
        assert_eq!(cats, ["Beverages", "Grocery", "Household", "Personal Care"]);
    }

    #[tokio::test]
    async fn test_inventory_table_uses_menu() {
        let store = seeded();
        let items = store.inventory.all().await.unwrap();
        let table = inventory_table(items, &ConfigState::default());

        assert_eq!(table.page_info().map(|p| p.total_rows), Some(8));
        match table.actions_for(&get_product(&store, "p-1").await.unwrap()) {
            ActionsView::Menu { items } => assert_eq!(items.len(), 3),
            other => panic!("expected a menu, got {:?}", other),
        }
    }
}
