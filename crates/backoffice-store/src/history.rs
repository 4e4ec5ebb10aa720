//! # Change History
//!
//! Append-only log of every create, edit and delete made through the pages.
//!
//! ## Entry Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PAGE MUTATION                                                          │
//! │       │                                                                 │
//! │       ├── create  → Created { snapshot: new record }                   │
//! │       ├── update  → Updated { changes: [field: old → new], snapshot }  │
//! │       │             (nothing logged when no field changed)             │
//! │       └── delete  → Deleted { reason, snapshot: removed record }       │
//! │                                                                         │
//! │  The snapshot is the record's JSON at that moment, so a deleted record │
//! │  can still be inspected after it left the repository.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use backoffice_core::{diff, Entity, FieldChange};

use crate::error::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryAction::Created => "created",
            HistoryAction::Updated => "updated",
            HistoryAction::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// One logged mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Record kind, e.g. "Product".
    pub entity: String,
    pub entity_id: String,
    pub action: HistoryAction,
    /// Changed fields; empty for creates and deletes.
    pub changes: Vec<FieldChange>,
    pub reason: Option<String>,
    pub snapshot: Value,
    pub at: DateTime<Utc>,
}

impl HistoryEntry {
    /// One-line description for activity feeds.
    pub fn summary(&self) -> String {
        let mut line = format!("{} {} {}", self.entity, self.entity_id, self.action);
        if !self.changes.is_empty() {
            let changes: Vec<String> = self.changes.iter().map(FieldChange::summary).collect();
            line.push_str(&format!(" ({})", changes.join(", ")));
        }
        if let Some(reason) = &self.reason {
            line.push_str(&format!(": {}", reason));
        }
        line
    }
}

// =============================================================================
// History Log
// =============================================================================

/// Shared, append-only history. Cloning shares the same log.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_created<T>(&self, record: &T) -> StoreResult<HistoryEntry>
    where
        T: Entity + Serialize,
    {
        let entry = Self::entry(record, HistoryAction::Created, Vec::new(), None)?;
        Ok(self.append(entry).await)
    }

    /// Logs an edit. Returns `None` (and logs nothing) when no field changed.
    pub async fn record_updated<T>(
        &self,
        before: &T,
        after: &T,
        reason: Option<String>,
    ) -> StoreResult<Option<HistoryEntry>>
    where
        T: Entity + Serialize,
    {
        let changes = diff(before, after);
        if changes.is_empty() {
            return Ok(None);
        }

        let entry = Self::entry(after, HistoryAction::Updated, changes, reason)?;
        Ok(Some(self.append(entry).await))
    }

    pub async fn record_deleted<T>(
        &self,
        record: &T,
        reason: Option<String>,
    ) -> StoreResult<HistoryEntry>
    where
        T: Entity + Serialize,
    {
        let entry = Self::entry(record, HistoryAction::Deleted, Vec::new(), reason)?;
        Ok(self.append(entry).await)
    }

    fn entry<T>(
        record: &T,
        action: HistoryAction,
        changes: Vec<FieldChange>,
        reason: Option<String>,
    ) -> StoreResult<HistoryEntry>
    where
        T: Entity + Serialize,
    {
        Ok(HistoryEntry {
            id: Uuid::new_v4().to_string(),
            entity: T::KIND.to_string(),
            entity_id: record.id().to_string(),
            action,
            changes,
            reason,
            snapshot: serde_json::to_value(record)?,
            at: Utc::now(),
        })
    }

    async fn append(&self, entry: HistoryEntry) -> HistoryEntry {
        debug!(
            entity = %entry.entity,
            entity_id = %entry.entity_id,
            action = %entry.action,
            changes = entry.changes.len(),
            "Appending history entry"
        );
        self.entries.write().await.push(entry.clone());
        entry
    }

    /// Every entry, oldest first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Entries of one record kind, oldest first.
    pub async fn for_kind(&self, entity: &str) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.entity == entity)
            .cloned()
            .collect()
    }

    /// Entries of one record, oldest first.
    pub async fn for_record(&self, entity: &str, entity_id: &str) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.entity == entity && e.entity_id == entity_id)
            .cloned()
            .collect()
    }

    /// The newest `limit` entries, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize)]
    struct Shelf {
        id: String,
        label: String,
        slots: i64,
    }

    impl Entity for Shelf {
        const KIND: &'static str = "Shelf";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn shelf(slots: i64) -> Shelf {
        Shelf {
            id: "s1".to_string(),
            label: "Aisle 3".to_string(),
            slots,
        }
    }

    #[tokio::test]
    async fn test_update_logs_only_changed_fields() {
        let log = HistoryLog::new();
        let entry = log
            .record_updated(&shelf(4), &shelf(6), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.action, HistoryAction::Updated);
        assert_eq!(entry.changes.len(), 1);
        assert_eq!(entry.changes[0].field, "slots");
        assert_eq!(entry.summary(), "Shelf s1 updated (slots: 4 → 6)");
        assert_eq!(log.len().await, 1);
    }

    #[tokio::test]
    async fn test_unchanged_update_is_not_logged() {
        let log = HistoryLog::new();
        let entry = log.record_updated(&shelf(4), &shelf(4), None).await.unwrap();
        assert!(entry.is_none());
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_keeps_snapshot_and_reason() {
        let log = HistoryLog::new();
        log.record_created(&shelf(4)).await.unwrap();
        log.record_deleted(&shelf(4), Some("Aisle removed".to_string()))
            .await
            .unwrap();

        let entries = log.for_record("Shelf", "s1").await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].snapshot["label"], json!("Aisle 3"));
        assert_eq!(entries[1].reason.as_deref(), Some("Aisle removed"));

        let recent = log.recent(1).await;
        assert_eq!(recent[0].action, HistoryAction::Deleted);
        assert!(log.for_kind("Product").await.is_empty());
    }
}
