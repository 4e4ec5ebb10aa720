//! # Mock Fixtures
//!
//! Sample records standing in for a backend. Dates are laid out relative to
//! the `today` passed in, so the calendar always has something due today and
//! the order list spans the last few weeks.
//!
//! ## Contents
//! - 8 products across Grocery, Beverages, Household and Personal Care,
//!   including one low-stock and one out-of-stock item
//! - 8 orders covering every order status and payment status
//! - 6 customers covering every customer status
//! - 6 reminders, events and notes

use chrono::{Duration, NaiveDate, NaiveTime};

use backoffice_core::{
    Customer, CustomerStatus, DeliveryMethod, InventoryItem, Money, MovementTotals, Order,
    OrderCustomer, OrderItem, OrderStatus, PaymentStatus, Reminder, ReminderKind, StockMovements,
};

/// Every seeded record set.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub inventory: Vec<InventoryItem>,
    pub orders: Vec<Order>,
    pub customers: Vec<Customer>,
    pub reminders: Vec<Reminder>,
}

/// Builds the full fixture set around `today`.
pub fn seed(today: NaiveDate) -> Fixtures {
    Fixtures {
        inventory: inventory(),
        orders: orders(today),
        customers: customers(),
        reminders: reminders(today),
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// (id, name, sku, category, stock, reorder, cost, price, this week, last week)
type ProductRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    i64,
    i64,
    i64,
    (i64, i64),
    (i64, i64),
);

const PRODUCTS: &[ProductRow] = &[
    ("p-1", "Basmati Rice 5kg", "GRC-RICE-5KG", "Grocery", 42, 10, 1_450, 1_850, (20, 14), (10, 12)),
    ("p-2", "Cooking Oil 1L", "GRC-OIL-1L", "Grocery", 8, 12, 480, 560, (0, 9), (24, 11)),
    ("p-3", "Red Lentils 1kg", "GRC-DAL-1KG", "Grocery", 65, 15, 290, 360, (30, 18), (0, 22)),
    ("p-4", "Green Tea 25 bags", "BEV-TEA-25", "Beverages", 0, 6, 210, 300, (0, 7), (12, 9)),
    ("p-5", "Mineral Water 1.5L", "BEV-WTR-1500", "Beverages", 120, 30, 60, 90, (96, 71), (48, 52)),
    ("p-6", "Dish Soap 500ml", "HSH-SOAP-500", "Household", 27, 8, 175, 240, (12, 6), (0, 5)),
    ("p-7", "Laundry Powder 1kg", "HSH-LND-1KG", "Household", 14, 10, 390, 495, (0, 3), (10, 8)),
    ("p-8", "Herbal Shampoo 200ml", "PRC-SHMP-200", "Personal Care", 33, 10, 320, 450, (24, 10), (0, 6)),
];

fn inventory() -> Vec<InventoryItem> {
    PRODUCTS
        .iter()
        .map(
            |&(id, name, sku, category, stock, reorder, cost, price, this_week, last_week)| {
                let mut item = InventoryItem {
                    id: id.to_string(),
                    name: name.to_string(),
                    sku: sku.to_string(),
                    category: category.to_string(),
                    current_stock: stock,
                    reorder_level: reorder,
                    cost_price: Money::from_major(cost),
                    selling_price: Money::from_major(price),
                    total_value: Money::zero(),
                    movements: StockMovements {
                        this_week: MovementTotals {
                            inbound: this_week.0,
                            outbound: this_week.1,
                        },
                        last_week: MovementTotals {
                            inbound: last_week.0,
                            outbound: last_week.1,
                        },
                    },
                };
                item.total_value = item.cost_price.multiply_quantity(item.current_stock);
                item
            },
        )
        .collect()
}

// =============================================================================
// Orders
// =============================================================================

fn line(name: &str, quantity: i64, price_major: i64) -> OrderItem {
    OrderItem {
        name: name.to_string(),
        quantity,
        price: Money::from_major(price_major),
    }
}

fn order(
    id: &str,
    customer: (&str, &str, &str),
    date: NaiveDate,
    items: Vec<OrderItem>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    delivery_method: DeliveryMethod,
) -> Order {
    let mut order = Order {
        id: id.to_string(),
        customer: OrderCustomer {
            name: customer.0.to_string(),
            phone: customer.1.to_string(),
            address: customer.2.to_string(),
        },
        date,
        items,
        amount: Money::zero(),
        status,
        payment_status,
        delivery_method,
    };
    order.amount = order.items.iter().map(OrderItem::line_total).sum();
    order
}

fn orders(today: NaiveDate) -> Vec<Order> {
    let days_ago = |n: i64| today - Duration::days(n);

    vec![
        order(
            "ORD-1001",
            ("Ayesha Khan", "0300-1234567", "12 Main Boulevard, Gulberg, Lahore"),
            days_ago(0),
            vec![line("Basmati Rice 5kg", 2, 1_850), line("Cooking Oil 1L", 3, 560)],
            OrderStatus::Pending,
            PaymentStatus::Pending,
            DeliveryMethod::Standard,
        ),
        order(
            "ORD-1002",
            ("Bilal Ahmed", "0321-7654321", "House 45, Block 7, Clifton, Karachi"),
            days_ago(1),
            vec![line("Mineral Water 1.5L", 12, 90)],
            OrderStatus::Confirmed,
            PaymentStatus::Paid,
            DeliveryMethod::Express,
        ),
        order(
            "ORD-1003",
            ("Sana Tariq", "0333-5550123", "F-7/2, Islamabad"),
            days_ago(3),
            vec![line("Herbal Shampoo 200ml", 2, 450), line("Dish Soap 500ml", 1, 240)],
            OrderStatus::Shipped,
            PaymentStatus::Partial,
            DeliveryMethod::Standard,
        ),
        order(
            "ORD-1004",
            ("Omar Farooq", "0345-2223344", "Saddar, Rawalpindi"),
            days_ago(6),
            vec![line("Red Lentils 1kg", 4, 360)],
            OrderStatus::Delivered,
            PaymentStatus::Paid,
            DeliveryMethod::Pickup,
        ),
        order(
            "ORD-1005",
            ("Hina Malik", "0301-9998877", "Model Town, Lahore"),
            days_ago(9),
            vec![line("Laundry Powder 1kg", 1, 495), line("Green Tea 25 bags", 2, 300)],
            OrderStatus::Returned,
            PaymentStatus::Paid,
            DeliveryMethod::Standard,
        ),
        order(
            "ORD-1006",
            ("Ayesha Khan", "0300-1234567", "12 Main Boulevard, Gulberg, Lahore"),
            days_ago(12),
            vec![line("Basmati Rice 5kg", 1, 1_850)],
            OrderStatus::Delivered,
            PaymentStatus::Paid,
            DeliveryMethod::Express,
        ),
        order(
            "ORD-1007",
            ("Usman Raza", "0312-4445566", "Cantt, Multan"),
            days_ago(18),
            vec![line("Cooking Oil 1L", 6, 560), line("Red Lentils 1kg", 6, 360)],
            OrderStatus::Pending,
            PaymentStatus::Partial,
            DeliveryMethod::Standard,
        ),
        order(
            "ORD-1008",
            ("Bilal Ahmed", "0321-7654321", "House 45, Block 7, Clifton, Karachi"),
            days_ago(27),
            vec![line("Dish Soap 500ml", 3, 240)],
            OrderStatus::Confirmed,
            PaymentStatus::Pending,
            DeliveryMethod::Pickup,
        ),
    ]
}

// =============================================================================
// Customers
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    address: &str,
    orders: (i64, i64),
    status: CustomerStatus,
    favorite_category: &str,
) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        total_orders: orders.0,
        total_spent: Money::from_major(orders.1),
        status,
        favorite_category: favorite_category.to_string(),
    }
}

fn customers() -> Vec<Customer> {
    vec![
        customer(
            "c-1",
            "Ayesha Khan",
            "ayesha.khan@example.com",
            "0300-1234567",
            "12 Main Boulevard, Gulberg, Lahore",
            (24, 86_400),
            CustomerStatus::Vip,
            "Grocery",
        ),
        customer(
            "c-2",
            "Bilal Ahmed",
            "bilal.ahmed@example.com",
            "0321-7654321",
            "House 45, Block 7, Clifton, Karachi",
            (11, 23_750),
            CustomerStatus::Regular,
            "Beverages",
        ),
        customer(
            "c-3",
            "Sana Tariq",
            "sana.tariq@example.com",
            "0333-5550123",
            "F-7/2, Islamabad",
            (2, 3_380),
            CustomerStatus::New,
            "Personal Care",
        ),
        customer(
            "c-4",
            "Omar Farooq",
            "omar.farooq@example.com",
            "0345-2223344",
            "Saddar, Rawalpindi",
            (7, 9_120),
            CustomerStatus::Regular,
            "Grocery",
        ),
        customer(
            "c-5",
            "Hina Malik",
            "hina.malik@example.com",
            "0301-9998877",
            "Model Town, Lahore",
            (5, 6_450),
            CustomerStatus::Inactive,
            "Household",
        ),
        customer(
            "c-6",
            "Usman Raza",
            "usman.raza@example.com",
            "0312-4445566",
            "Cantt, Multan",
            (31, 112_900),
            CustomerStatus::Vip,
            "Grocery",
        ),
    ]
}

// =============================================================================
// Calendar
// =============================================================================

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn reminders(today: NaiveDate) -> Vec<Reminder> {
    let reminder = |id: &str,
                    title: &str,
                    description: &str,
                    offset_days: i64,
                    time: NaiveTime,
                    kind: ReminderKind,
                    completed: bool| Reminder {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: today + Duration::days(offset_days),
        time,
        kind,
        completed,
    };

    vec![
        reminder(
            "r-1",
            "Reorder cooking oil",
            "Stock is below the reorder level",
            0,
            at(10, 0),
            ReminderKind::Reminder,
            false,
        ),
        reminder(
            "r-2",
            "Supplier meeting",
            "Quarterly pricing review with the rice supplier",
            0,
            at(15, 30),
            ReminderKind::Event,
            false,
        ),
        reminder(
            "r-3",
            "Restock green tea",
            "Out of stock since last week",
            -1,
            at(9, 0),
            ReminderKind::Reminder,
            true,
        ),
        reminder(
            "r-4",
            "Eid sale planning",
            "Pick discounted items and update the banner",
            3,
            at(11, 0),
            ReminderKind::Event,
            false,
        ),
        reminder(
            "r-5",
            "Courier rates",
            "Express courier raised rates by 8% from next month",
            -4,
            at(17, 45),
            ReminderKind::Note,
            false,
        ),
        reminder(
            "r-6",
            "Monthly stock count",
            "Count household and personal care shelves",
            7,
            at(8, 30),
            ReminderKind::Reminder,
            false,
        ),
    ]
}
