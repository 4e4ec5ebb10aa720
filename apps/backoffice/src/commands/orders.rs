//! # Order Commands
//!
//! Order CRUD, status changes and the orders table.
//!
//! Statuses change without transition guards: any order status or payment
//! status can be set from any other. The order amount is always recomputed
//! from its lines.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use backoffice_core::dates::parse_dmy_field;
use backoffice_core::table::{Align, BulkAction, Column, RowAction, TableOptions};
use backoffice_core::validation::{parse_price, parse_quantity, validate_name, validate_required, FormValidator};
use backoffice_core::{
    new_id, CellValue, DataTable, DateRange, DeliveryMethod, FieldErrors, Money, Order,
    OrderCustomer, OrderItem, OrderStatus, Page, PageRequest, PaymentStatus,
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
pub enum OrderSortKey {
    Id,
    Customer,
    Date,
    Amount,
    Status,
    PaymentStatus,
}

impl SortField<Order> for OrderSortKey {
    fn value(self, order: &Order) -> CellValue {
        match self {
            OrderSortKey::Id => order.id.as_str().into(),
            OrderSortKey::Customer => order.customer.name.to_lowercase().into(),
            OrderSortKey::Date => order.date.into(),
            OrderSortKey::Amount => order.amount.into(),
            OrderSortKey::Status => order.status.to_string().into(),
            OrderSortKey::PaymentStatus => order.payment_status.to_string().into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderQuery {
    pub search: String,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Orders dated inside the range, both ends inclusive.
    pub range: Option<DateRange>,
    pub sort: Option<SortSpec<OrderSortKey>>,
    pub page: Option<PageRequest>,
}

/// Lists orders matching the search, facets and date range.
///
/// The search covers order id, customer name and phone. Without an explicit
/// sort, newest orders come first.
pub async fn list_orders(store: &StoreState, query: OrderQuery) -> Result<Page<Order>, ApiError> {
    let mut list = with_search(ListQuery::new(), &query.search, |order: &Order| {
        format!("{} {} {}", order.id, order.customer.name, order.customer.phone)
    })?;

    if let Some(status) = query.status {
        list = list.filter(move |order| order.status == status);
    }
    if let Some(payment) = query.payment_status {
        list = list.filter(move |order| order.payment_status == payment);
    }
    if let Some(range) = query.range {
        list = list.filter(move |order| range.contains(order.date));
    }

    let sort = query.sort.or(Some(SortSpec::descending(OrderSortKey::Date)));
    list = with_sort(list, sort);
    if let Some(page) = query.page {
        list = list.page(page);
    }

    Ok(store.orders.list(list).await?)
}

pub async fn get_order(store: &StoreState, id: &str) -> Result<Order, ApiError> {
    Ok(store.orders.require(id).await?)
}

// =============================================================================
// Create / Update / Delete
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItemForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

/// New/Edit Order dialog. `date` is `DD-MM-YYYY`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub date: String,
    pub items: Vec<OrderItemForm>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub delivery_method: DeliveryMethod,
}

impl OrderForm {
    /// Builds the order body; line errors are keyed `items[i].field`.
    fn validate(&self, id: String) -> Result<Order, FieldErrors> {
        let mut form = FormValidator::new();
        form.check(validate_name("customer_name", &self.customer_name))
            .check(validate_required("customer_phone", &self.customer_phone))
            .check(validate_required("customer_address", &self.customer_address));
        let date = form.value(parse_dmy_field("date", &self.date));

        if self.items.is_empty() {
            form.reject("items", "at least one item is required");
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (i, line) in self.items.iter().enumerate() {
            form.check(validate_required(&format!("items[{}].name", i), &line.name));
            let quantity = form.value(parse_quantity(&format!("items[{}].quantity", i), &line.quantity));
            let price = form.value(parse_price(&format!("items[{}].price", i), &line.price));

            if let (Some(quantity), Some(price)) = (quantity, price) {
                items.push(OrderItem {
                    name: line.name.trim().to_string(),
                    quantity,
                    price,
                });
            }
        }

        let parsed = date.map(|date| Order {
            id,
            customer: OrderCustomer {
                name: self.customer_name.trim().to_string(),
                phone: self.customer_phone.trim().to_string(),
                address: self.customer_address.trim().to_string(),
            },
            date,
            items,
            amount: Money::zero(),
            status: self.status,
            payment_status: self.payment_status,
            delivery_method: self.delivery_method,
        });
        let parsed = parsed.map(|mut order| {
            form.check(order.recompute_amount());
            order
        });

        finish_form(form, parsed)
    }
}

pub async fn create_order(store: &StoreState, form: OrderForm) -> Result<Order, ApiError> {
    let order = form.validate(new_id())?;

    let order = store.orders.create(order).await?;
    store.history.record_created(&order).await?;

    info!(id = %order.id, amount = %order.amount, "Order created");
    Ok(order)
}

/// Replaces an order with the edited form.
pub async fn update_order(
    store: &StoreState,
    id: &str,
    form: OrderForm,
    reason: Option<String>,
) -> Result<Order, ApiError> {
    store.orders.require(id).await?;
    let updated = form.validate(id.to_string())?;

    let previous = store.orders.update(updated.clone()).await?;
    store
        .history
        .record_updated(&previous, &updated, optional_reason(reason))
        .await?;

    info!(id = %updated.id, "Order updated");
    Ok(updated)
}

pub async fn delete_order(
    store: &StoreState,
    id: &str,
    reason: Option<String>,
) -> Result<Order, ApiError> {
    let removed = store.orders.remove(id).await?;
    store
        .history
        .record_deleted(&removed, optional_reason(reason))
        .await?;

    info!(id = %removed.id, "Order deleted");
    Ok(removed)
}

// =============================================================================
// Status Changes
// =============================================================================

/// Applies `change` to one order and logs the edit.
async fn modify_order(
    store: &StoreState,
    id: &str,
    change: impl FnOnce(&mut Order),
) -> Result<Order, ApiError> {
    let mut updated = store.orders.require(id).await?;
    change(&mut updated);

    let previous = store.orders.update(updated.clone()).await?;
    store.history.record_updated(&previous, &updated, None).await?;
    Ok(updated)
}

pub async fn update_status(
    store: &StoreState,
    id: &str,
    status: OrderStatus,
) -> Result<Order, ApiError> {
    let order = modify_order(store, id, |order| order.status = status).await?;
    info!(id = %id, status = %status, "Order status changed");
    Ok(order)
}

pub async fn mark_paid(store: &StoreState, id: &str) -> Result<Order, ApiError> {
    let order = modify_order(store, id, |order| order.payment_status = PaymentStatus::Paid).await?;
    info!(id = %id, "Order marked paid");
    Ok(order)
}

/// Bulk "Mark Paid". Stops at the first unknown id; earlier orders stay paid.
pub async fn mark_many_paid(store: &StoreState, ids: &[String]) -> Result<Vec<Order>, ApiError> {
    let mut updated = Vec::with_capacity(ids.len());
    for id in ids {
        match mark_paid(store, id).await {
            Ok(order) => updated.push(order),
            Err(err) => {
                warn!(id = %id, marked = updated.len(), "Bulk mark paid stopped: {}", err);
                return Err(err);
            }
        }
    }
    Ok(updated)
}

// =============================================================================
// Table
// =============================================================================

/// Orders table with row selection, a per-row Mark Paid for unpaid orders
/// and a bulk Mark Paid.
pub fn order_table(orders: Vec<Order>, config: &ConfigState) -> DataTable<Order> {
    let columns = vec![
        Column::new("id", "Order", |o: &Order| o.id.as_str().into())
            .sortable()
            .width("120px"),
        Column::new("customer", "Customer", |o: &Order| o.customer.name.as_str().into()).sortable(),
        Column::new("date", "Date", |o: &Order| o.date.into())
            .sortable()
            .searchable(false),
        Column::new("items", "Items", |o: &Order| o.item_count().into())
            .searchable(false)
            .align(Align::Right),
        Column::new("amount", "Amount", |o: &Order| o.amount.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
        Column::new("status", "Status", |o: &Order| o.status.to_string().into()).sortable(),
        Column::new("payment_status", "Payment", |o: &Order| {
            o.payment_status.to_string().into()
        })
        .sortable(),
    ];

    DataTable::new(orders, columns)
        .with_options(TableOptions {
            selectable: true,
            ..config.table_options()
        })
        .with_row_action(RowAction::new("view", "View"))
        .with_row_action(
            RowAction::new("mark_paid", "Mark Paid")
                .when(|o: &Order| o.payment_status != PaymentStatus::Paid),
        )
        .with_bulk_action(BulkAction::new("mark_paid", "Mark Paid"))
}

// =============================================================================
// Unit Tests
// =============================================================================
