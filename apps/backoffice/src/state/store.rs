//! # Store State
//!
//! One repository per page plus the shared history log.
//!
//! Pages only see `dyn Repository<T>`; the in-memory backend is chosen here
//! and nowhere else.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use backoffice_core::{Customer, InventoryItem, Order, Reminder};
use backoffice_store::fixtures::{self, Fixtures};
use backoffice_store::{HistoryLog, InMemoryRepository, Repository};

#[derive(Clone)]
pub struct StoreState {
    pub inventory: Arc<dyn Repository<InventoryItem>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub customers: Arc<dyn Repository<Customer>>,
    pub reminders: Arc<dyn Repository<Reminder>>,
    pub history: HistoryLog,
}

impl StoreState {
    /// In-memory store with no records.
    pub fn empty() -> Self {
        Self::from_fixtures(Fixtures {
            inventory: Vec::new(),
            orders: Vec::new(),
            customers: Vec::new(),
            reminders: Vec::new(),
        })
    }

    /// In-memory store loaded with the mock records for `today`.
    pub fn seeded(today: NaiveDate) -> Self {
        let store = Self::from_fixtures(fixtures::seed(today));
        info!(%today, "Store seeded from fixtures");
        store
    }

    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        StoreState {
            inventory: Arc::new(InMemoryRepository::with_records(fixtures.inventory)),
            orders: Arc::new(InMemoryRepository::with_records(fixtures.orders)),
            customers: Arc::new(InMemoryRepository::with_records(fixtures.customers)),
            reminders: Arc::new(InMemoryRepository::with_records(fixtures.reminders)),
            history: HistoryLog::new(),
        }
    }
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
