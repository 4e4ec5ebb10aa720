//! # In-Memory Repository
//!
//! Records live in a `Vec` behind a tokio `RwLock` and vanish on restart.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Arc<RwLock<Vec<T>>>                                       │
//! │    list / get / count   → read lock, clone out             │
//! │    create / update / remove → write lock, one lookup by id │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Insertion order is preserved, so an unsorted list shows records in the
//! order they were seeded or created.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use backoffice_core::query::Page;
use backoffice_core::Entity;

use super::{ListQuery, Repository};
use crate::error::{StoreError, StoreResult};

/// Repository backed by process memory.
///
/// Cloning shares the same records.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        InMemoryRepository {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Starts from fixture records.
    pub fn with_records(records: Vec<T>) -> Self {
        InMemoryRepository {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn list(&self, query: ListQuery<T>) -> StoreResult<Page<T>> {
        let records = self.records.read().await;
        let matched: Vec<T> = records.iter().filter(|r| query.matches(r)).cloned().collect();
        drop(records);

        let page = query.arrange(matched);
        debug!(
            entity = T::KIND,
            total = page.total_items,
            page = page.page,
            "Listed records"
        );
        Ok(page)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, record: T) -> StoreResult<T> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::duplicate(T::KIND, record.id()));
        }

        debug!(entity = T::KIND, id = %record.id(), "Creating record");
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> StoreResult<T> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::not_found(T::KIND, record.id()))?;

        debug!(entity = T::KIND, id = %record.id(), "Updating record");
        Ok(std::mem::replace(slot, record))
    }

    async fn remove(&self, id: &str) -> StoreResult<T> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        debug!(entity = T::KIND, id = %id, "Removing record");
        Ok(records.remove(index))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.records.read().await.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{PageRequest, SortDirection};

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: String,
        label: String,
    }

    impl Entity for Tag {
        const KIND: &'static str = "Tag";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn tag(id: &str, label: &str) -> Tag {
        Tag {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    fn repo() -> InMemoryRepository<Tag> {
        InMemoryRepository::with_records(vec![
            tag("t1", "urgent"),
            tag("t2", "fragile"),
            tag("t3", "gift"),
        ])
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let repo = repo();
        repo.create(tag("t4", "bulk")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 4);

        let err = repo.create(tag("t1", "again")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_update_returns_previous_version() {
        let repo = repo();
        let previous = repo.update(tag("t2", "handle with care")).await.unwrap();

        assert_eq!(previous.label, "fragile");
        assert_eq!(
            repo.get("t2").await.unwrap().map(|t| t.label),
            Some("handle with care".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = repo().update(tag("nope", "x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Tag not found: nope");
    }

    #[tokio::test]
    async fn test_remove_returns_record() {
        let repo = repo();
        let removed = repo.remove("t1").await.unwrap();

        assert_eq!(removed.label, "urgent");
        assert!(repo.get("t1").await.unwrap().is_none());
        assert!(repo.remove("t1").await.is_err());
    }

    #[tokio::test]
    async fn test_list_sorted_and_paged() {
        let query = ListQuery::new()
            .sort_by(|t: &Tag| t.label.as_str().into(), SortDirection::Ascending)
            .page(PageRequest::new(1, 2));

        let page = repo().list(query).await.unwrap();
        let labels: Vec<&str> = page.items.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["fragile", "gift"]);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let repo = repo();
        let other = repo.clone();
        other.remove("t3").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_require_through_trait_object() {
        let repo: Arc<dyn Repository<Tag>> = Arc::new(repo());
        assert_eq!(repo.require("t3").await.unwrap().label, "gift");
        assert!(matches!(
            repo.require("zz").await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
