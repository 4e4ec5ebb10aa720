//! # Domain Types
//!
//! Record types shown and edited by the back office pages.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │  InventoryItem  │   │      Order      │   │    Customer     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id, sku        │   │  id             │   │  id             │        │
//! │  │  current_stock  │   │  customer       │   │  status (VIP..) │        │
//! │  │  cost_price     │   │  items[]        │   │  total_orders   │        │
//! │  │  total_value ◄──┼─┐ │  amount ◄───────┼─┐ │  total_spent    │        │
//! │  └─────────────────┘ │ └─────────────────┘ │ └─────────────────┘        │
//! │     stock × cost ────┘    Σ qty × price ───┘                            │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Reminder     │   reminder | event | note, with a completed flag   │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derived fields (`total_value`, `amount`) are stored on the record so the
//! table and the TypeScript bindings see them, and are recomputed by the
//! `recompute_*` helpers whenever their inputs change.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::dates::{dmy, hm};
use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;

// =============================================================================
// Entity
// =============================================================================

/// A record with a stable identity, storable in a repository and selectable
/// in a data table.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable entity name used in errors and history ("Product", ...).
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Generates a new record id (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Inventory
// =============================================================================

/// Inbound/outbound unit counts for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MovementTotals {
    #[serde(rename = "in")]
    pub inbound: i64,
    #[serde(rename = "out")]
    pub outbound: i64,
}

/// Stock movements shown on the inventory page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockMovements {
    pub this_week: MovementTotals,
    pub last_week: MovementTotals,
}

/// A product held in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Stock Keeping Unit - business identifier.
    pub sku: String,
    pub category: String,
    pub current_stock: i64,
    /// At or below this level the item counts as low stock.
    pub reorder_level: i64,
    pub cost_price: Money,
    pub selling_price: Money,
    /// `current_stock × cost_price`.
    pub total_value: Money,
    pub movements: StockMovements,
}

impl InventoryItem {
    /// Sets `total_value` to stock × cost; fails on `current_stock` when the
    /// product does not fit.
    pub fn recompute_total_value(&mut self) -> ValidationResult<()> {
        self.total_value = self
            .cost_price
            .checked_mul_quantity(self.current_stock)
            .ok_or_else(|| ValidationError::TooLarge {
                field: "current_stock".to_string(),
            })?;
        Ok(())
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= 0 {
            StockStatus::OutOfStock
        } else if self.current_stock <= self.reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Selling price minus cost price, per unit.
    pub fn unit_margin(&self) -> Money {
        self.selling_price - self.cost_price
    }
}

impl Entity for InventoryItem {
    const KIND: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Stock badge shown next to each inventory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Returned,
    ];
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Returned => "returned",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Partial,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    #[default]
    Standard,
    Express,
    Pickup,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeliveryMethod::Standard => "standard",
            DeliveryMethod::Express => "express",
            DeliveryMethod::Pickup => "pickup",
        };
        f.write_str(label)
    }
}

/// Contact details captured with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub name: String,
    pub quantity: i64,
    pub price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer: OrderCustomer,
    #[serde(with = "dmy")]
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub items: Vec<OrderItem>,
    /// Σ `quantity × price` over `items`.
    pub amount: Money,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub delivery_method: DeliveryMethod,
}

impl Order {
    /// Sets `amount` to the sum of the line totals; fails on `items` when the
    /// total does not fit.
    pub fn recompute_amount(&mut self) -> ValidationResult<()> {
        self.amount = self
            .items
            .iter()
            .try_fold(Money::zero(), |total, item| {
                item.price
                    .checked_mul_quantity(item.quantity)
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| ValidationError::TooLarge {
                field: "items".to_string(),
            })?;
        Ok(())
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |count, i| count.saturating_add(i.quantity))
    }
}

impl Entity for Order {
    const KIND: &'static str = "Order";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CustomerStatus {
    #[serde(rename = "VIP")]
    Vip,
    Regular,
    #[default]
    New,
    Inactive,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CustomerStatus::Vip => "VIP",
            CustomerStatus::Regular => "Regular",
            CustomerStatus::New => "New",
            CustomerStatus::Inactive => "Inactive",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total_orders: i64,
    pub total_spent: Money,
    pub status: CustomerStatus,
    pub favorite_category: String,
}

impl Customer {
    /// Average spend per order, zero for customers without orders.
    pub fn average_order_value(&self) -> Money {
        if self.total_orders <= 0 {
            return Money::zero();
        }
        Money::from_minor(self.total_spent.minor() / self.total_orders)
    }
}

impl Entity for Customer {
    const KIND: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Calendar
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    #[default]
    Reminder,
    Event,
    Note,
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReminderKind::Reminder => "reminder",
            ReminderKind::Event => "event",
            ReminderKind::Note => "note",
        };
        f.write_str(label)
    }
}

/// A calendar reminder, event or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "dmy")]
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(with = "hm")]
    #[ts(as = "String")]
    pub time: NaiveTime,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub completed: bool,
}

impl Entity for Reminder {
    const KIND: &'static str = "Reminder";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
