//! # Repository Module
//!
//! One storage abstraction shared by every page.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Page command (inventory::delete_product)                              │
//! │       │                                                                 │
//! │       │  repo.remove("p-3")                                            │
//! │       ▼                                                                 │
//! │  dyn Repository<InventoryItem>                                         │
//! │  ├── list(&self, ListQuery)   filter → sort → page                     │
//! │  ├── get(&self, id)                                                    │
//! │  ├── create(&self, record)                                             │
//! │  ├── update(&self, record)    → previous version                      │
//! │  └── remove(&self, id)        → removed record                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InMemoryRepository<T>  (RwLock<Vec<T>>, seeded from fixtures)         │
//! │                                                                         │
//! │  Pages hold `Arc<dyn Repository<T>>`, so a networked backend can       │
//! │  replace the in-memory one without touching them.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;

use async_trait::async_trait;

use backoffice_core::query::{paginate, sort_rows, CellValue, Page, PageRequest, SortDirection};
use backoffice_core::Entity;

use crate::error::{StoreError, StoreResult};

pub use memory::InMemoryRepository;

type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type SortKey<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;

// =============================================================================
// List Query
// =============================================================================

/// Filter, sort and paging for [`Repository::list`].
///
/// Filters are combined with AND. Without a page request every match is
/// returned on a single page.
///
/// ```rust
/// use backoffice_core::{Customer, CustomerStatus, SortDirection};
/// use backoffice_store::repository::ListQuery;
///
/// let query: ListQuery<Customer> = ListQuery::<Customer>::new()
///     .filter(|c| c.status == CustomerStatus::Vip)
///     .sort_by(|c| c.total_spent.into(), SortDirection::Descending);
/// ```
pub struct ListQuery<T> {
    filters: Vec<Filter<T>>,
    sort: Option<(SortKey<T>, SortDirection)>,
    page: Option<PageRequest>,
}

impl<T> ListQuery<T> {
    pub fn new() -> Self {
        ListQuery {
            filters: Vec::new(),
            sort: None,
            page: None,
        }
    }

    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(predicate));
        self
    }

    pub fn sort_by(
        mut self,
        key: impl Fn(&T) -> CellValue + Send + Sync + 'static,
        direction: SortDirection,
    ) -> Self {
        self.sort = Some((Box::new(key), direction));
        self
    }

    pub fn page(mut self, request: PageRequest) -> Self {
        self.page = Some(request);
        self
    }

    pub fn matches(&self, record: &T) -> bool {
        self.filters.iter().all(|f| f(record))
    }

    /// Runs the whole pipeline over owned records.
    pub fn apply(&self, records: Vec<T>) -> Page<T> {
        let matched: Vec<T> = records.into_iter().filter(|r| self.matches(r)).collect();
        self.arrange(matched)
    }

    /// Sorts and pages records that already passed [`ListQuery::matches`].
    pub fn arrange(&self, matched: Vec<T>) -> Page<T> {
        let sorted = match &self.sort {
            Some((key, direction)) => sort_rows(matched, |r| key(r), *direction),
            None => matched,
        };

        match self.page {
            Some(request) => paginate(sorted, request),
            None => Page::all(sorted),
        }
    }
}

impl<T> Default for ListQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ListQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListQuery")
            .field("filters", &self.filters.len())
            .field("sort", &self.sort.as_ref().map(|(_, d)| *d))
            .field("page", &self.page)
            .finish()
    }
}

// =============================================================================
// Repository Trait
// =============================================================================

/// Storage for one record type.
///
/// Every read hands back owned copies; callers never hold references into
/// the store.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn list(&self, query: ListQuery<T>) -> StoreResult<Page<T>>;

    async fn get(&self, id: &str) -> StoreResult<Option<T>>;

    /// Appends a record. Fails with `Duplicate` when the id is taken.
    async fn create(&self, record: T) -> StoreResult<T>;

    /// Replaces the record with the same id and returns the previous version.
    async fn update(&self, record: T) -> StoreResult<T>;

    /// Removes a record and returns it.
    async fn remove(&self, id: &str) -> StoreResult<T>;

    async fn count(&self) -> StoreResult<usize>;

    /// Like [`Repository::get`], but a missing record is an error.
    async fn require(&self, id: &str) -> StoreResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    async fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.list(ListQuery::new()).await?.items)
    }
}
