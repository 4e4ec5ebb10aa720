//! # Customer Commands
//!
//! Customer CRUD, status changes and the customers table.
//!
//! Order totals (`total_orders`, `total_spent`) are owned by the order
//! history: new customers start at zero and edits never touch them.

use serde::{Deserialize, Serialize};
use tracing::info;

use backoffice_core::table::{Align, Column, RowAction};
use backoffice_core::validation::{validate_email, validate_name, validate_required, FormValidator};
use backoffice_core::{
    new_id, CellValue, Customer, CustomerStatus, DataTable, FieldErrors, Money, Page, PageRequest,
};
use backoffice_store::ListQuery;

use super::{optional_reason, with_search, with_sort, SortField, SortSpec};
use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSortKey {
    Name,
    Email,
    TotalOrders,
    TotalSpent,
    Status,
}

impl SortField<Customer> for CustomerSortKey {
    fn value(self, customer: &Customer) -> CellValue {
        match self {
            CustomerSortKey::Name => customer.name.to_lowercase().into(),
            CustomerSortKey::Email => customer.email.to_lowercase().into(),
            CustomerSortKey::TotalOrders => customer.total_orders.into(),
            CustomerSortKey::TotalSpent => customer.total_spent.into(),
            CustomerSortKey::Status => customer.status.to_string().into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerQuery {
    pub search: String,
    pub status: Option<CustomerStatus>,
    pub sort: Option<SortSpec<CustomerSortKey>>,
    pub page: Option<PageRequest>,
}

/// Lists customers by name, email or phone, optionally of one status.
pub async fn list_customers(
    store: &StoreState,
    query: CustomerQuery,
) -> Result<Page<Customer>, ApiError> {
    let mut list = with_search(ListQuery::new(), &query.search, |c: &Customer| {
        format!("{} {} {}", c.name, c.email, c.phone)
    })?;

    if let Some(status) = query.status {
        list = list.filter(move |c| c.status == status);
    }

    list = with_sort(list, query.sort);
    if let Some(page) = query.page {
        list = list.page(page);
    }

    Ok(store.customers.list(list).await?)
}

pub async fn get_customer(store: &StoreState, id: &str) -> Result<Customer, ApiError> {
    Ok(store.customers.require(id).await?)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
    pub favorite_category: String,
}

impl CustomerForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut form = FormValidator::new();
        form.check(validate_name("name", &self.name))
            .check(validate_email(&self.email))
            .check(validate_required("phone", &self.phone));
        form.finish()
    }

    /// Copies the form onto `customer`, leaving the order totals alone.
    fn apply_to(self, customer: &mut Customer) {
        customer.name = self.name.trim().to_string();
        customer.email = self.email.trim().to_lowercase();
        customer.phone = self.phone.trim().to_string();
        customer.address = self.address.trim().to_string();
        customer.status = self.status;
        customer.favorite_category = self.favorite_category.trim().to_string();
    }
}

pub async fn create_customer(store: &StoreState, form: CustomerForm) -> Result<Customer, ApiError> {
    form.validate()?;

    let mut customer = Customer {
        id: new_id(),
        name: String::new(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
        total_orders: 0,
        total_spent: Money::zero(),
        status: CustomerStatus::New,
        favorite_category: String::new(),
    };
    form.apply_to(&mut customer);

    let customer = store.customers.create(customer).await?;
    store.history.record_created(&customer).await?;

    info!(id = %customer.id, "Customer created");
    Ok(customer)
}

pub async fn update_customer(
    store: &StoreState,
    id: &str,
    form: CustomerForm,
    reason: Option<String>,
) -> Result<Customer, ApiError> {
    let mut updated = store.customers.require(id).await?;
    form.validate()?;
    form.apply_to(&mut updated);

    let previous = store.customers.update(updated.clone()).await?;
    store
        .history
        .record_updated(&previous, &updated, optional_reason(reason))
        .await?;

    info!(id = %updated.id, "Customer updated");
    Ok(updated)
}

pub async fn delete_customer(
    store: &StoreState,
    id: &str,
    reason: Option<String>,
) -> Result<Customer, ApiError> {
    let removed = store.customers.remove(id).await?;
    store
        .history
        .record_deleted(&removed, optional_reason(reason))
        .await?;

    info!(id = %removed.id, "Customer deleted");
    Ok(removed)
}

pub async fn set_status(
    store: &StoreState,
    id: &str,
    status: CustomerStatus,
) -> Result<Customer, ApiError> {
    let previous = store.customers.require(id).await?;
    let updated = Customer {
        status,
        ..previous.clone()
    };

    store.customers.update(updated.clone()).await?;
    store.history.record_updated(&previous, &updated, None).await?;

    info!(id = %id, status = %status, "Customer status changed");
    Ok(updated)
}

pub fn customer_table(customers: Vec<Customer>, config: &ConfigState) -> DataTable<Customer> {
    let columns = vec![
        Column::new("name", "Customer", |c: &Customer| c.name.as_str().into()).sortable(),
        Column::new("email", "Email", |c: &Customer| c.email.as_str().into()).sortable(),
        Column::new("phone", "Phone", |c: &Customer| c.phone.as_str().into()),
        Column::new("total_orders", "Orders", |c: &Customer| c.total_orders.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
        Column::new("total_spent", "Spent", |c: &Customer| c.total_spent.into())
            .sortable()
            .searchable(false)
            .align(Align::Right),
        Column::new("status", "Status", |c: &Customer| c.status.to_string().into()).sortable(),
    ];

    DataTable::new(customers, columns)
        .with_options(config.table_options())
        .with_search_key(|c: &Customer| format!("{} {} {}", c.name, c.email, c.phone))
        .with_row_action(RowAction::new("edit", "Edit"))
        .with_row_action(RowAction::new("delete", "Delete"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seeded() -> StoreState {
        StoreState::seeded(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn form() -> CustomerForm {
        CustomerForm {
            name: "Zara Sheikh".to_string(),
            email: "Zara.Sheikh@Example.com".to_string(),
            phone: "0300-0001112".to_string(),
            address: "DHA Phase 5, Lahore".to_string(),
            status: CustomerStatus::New,
            favorite_category: "Beverages".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_without_orders() {
        let store = StoreState::empty();
        let customer = create_customer(&store, form()).await.unwrap();

        assert_eq!(customer.email, "zara.sheikh@example.com");
        assert_eq!(customer.total_orders, 0);
        assert_eq!(customer.average_order_value(), Money::zero());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let store = StoreState::empty();
        let bad = CustomerForm {
            email: "not-an-email".to_string(),
            phone: " ".to_string(),
            ..form()
        };

        let err = create_customer(&store, bad).await.unwrap_err();
        assert!(err.field("email").is_some());
        assert_eq!(err.field("phone"), Some("phone is required"));
    }

    #[tokio::test]
    async fn test_update_keeps_totals() {
        let store = seeded();
        let edit = CustomerForm {
            name: "Ayesha Khan".to_string(),
            email: "ayesha.khan@example.com".to_string(),
            phone: "0300-7654321".to_string(),
            address: "12 Main Boulevard, Gulberg, Lahore".to_string(),
            status: CustomerStatus::Vip,
            favorite_category: "Grocery".to_string(),
        };

        let updated = update_customer(&store, "c-1", edit, None).await.unwrap();
        assert_eq!(updated.total_orders, 24);
        assert_eq!(updated.total_spent, Money::from_major(86_400));

        let entries = store.history.for_record("Customer", "c-1").await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].changes.len(), 1);
        assert_eq!(entries[0].changes[0].field, "phone");
    }

    #[tokio::test]
    async fn test_set_status_and_filter() {
        let store = seeded();
        set_status(&store, "c-5", CustomerStatus::Regular).await.unwrap();

        let regulars = list_customers(
            &store,
            CustomerQuery {
                status: Some(CustomerStatus::Regular),
                sort: Some(SortSpec::descending(CustomerSortKey::TotalSpent)),
                ..CustomerQuery::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = regulars.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c-2", "c-4", "c-5"]);
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let store = seeded();
        let removed = delete_customer(&store, "c-3", Some("duplicate".into())).await.unwrap();
        assert_eq!(removed.name, "Sana Tariq");
        assert!(get_customer(&store, "c-3").await.is_err());
    }

    #[tokio::test]
    async fn test_customer_table_searches_email() {
        let store = seeded();
        let mut table = customer_table(store.customers.all().await.unwrap(), &ConfigState::default());

        table.set_query("usman.raza@");
        let ids: Vec<_> = table.visible_rows().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, ["c-6"]);
    }
}
