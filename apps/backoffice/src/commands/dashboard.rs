//! # Dashboard Command
//!
//! Headline counters shown above the page tables.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use backoffice_core::{Money, OrderStatus, PaymentStatus, StockStatus};

use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

/// Entries shown in the recent activity feed.
const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub store_name: String,
    /// Every order status, including the ones with no orders.
    pub orders_by_status: BTreeMap<String, usize>,
    pub paid_revenue: Money,
    /// Amount of orders not yet fully paid.
    pub outstanding: Money,
    pub paid_revenue_display: String,
    pub outstanding_display: String,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub inventory_value: Money,
    pub customers_by_status: BTreeMap<String, usize>,
    pub open_reminders_today: usize,
    pub recent_activity: Vec<String>,
}

pub async fn summary(
    store: &StoreState,
    config: &ConfigState,
    today: NaiveDate,
) -> Result<DashboardSummary, ApiError> {
    let orders = store.orders.all().await?;
    let inventory = store.inventory.all().await?;
    let customers = store.customers.all().await?;
    let reminders = store.reminders.all().await?;

    let mut orders_by_status: BTreeMap<String, usize> =
        OrderStatus::ALL.iter().map(|s| (s.to_string(), 0)).collect();
    let mut paid_revenue = Money::zero();
    let mut outstanding = Money::zero();
    for order in &orders {
        *orders_by_status.entry(order.status.to_string()).or_default() += 1;
        match order.payment_status {
            PaymentStatus::Paid => paid_revenue += order.amount,
            PaymentStatus::Pending | PaymentStatus::Partial => outstanding += order.amount,
        }
    }

    let mut customers_by_status: BTreeMap<String, usize> = BTreeMap::new();
    for customer in &customers {
        *customers_by_status.entry(customer.status.to_string()).or_default() += 1;
    }

    let count_stock = |status: StockStatus| {
        inventory
            .iter()
            .filter(|item| item.stock_status() == status)
            .count()
    };

    let recent_activity = store
        .history
        .recent(RECENT_ACTIVITY)
        .await
        .iter()
        .map(|entry| entry.summary())
        .collect();

    Ok(DashboardSummary {
        store_name: config.store_name.clone(),
        orders_by_status,
        paid_revenue_display: config.format_currency(paid_revenue),
        outstanding_display: config.format_currency(outstanding),
        paid_revenue,
        outstanding,
        low_stock: count_stock(StockStatus::LowStock),
        out_of_stock: count_stock(StockStatus::OutOfStock),
        inventory_value: inventory.iter().map(|item| item.total_value).sum(),
        customers_by_status,
        open_reminders_today: reminders
            .iter()
            .filter(|r| r.date == today && !r.completed)
            .count(),
        recent_activity,
    })
}
