//! # Field Changes
//!
//! Diffs two versions of a record into a list of field-level changes.
//!
//! Edits on every page are logged as "field: old → new". Instead of each page
//! comparing its fields by hand, both versions are serialized with serde and
//! compared per top-level field, so a record type only has to derive
//! `Serialize` to get change tracking.
//!
//! ```text
//! before: { "selling_price": 65000, "current_stock": 20, ... }
//! after:  { "selling_price": 70000, "current_stock": 20, ... }
//!                     │
//!                     ▼
//! [ FieldChange { field: "selling_price", old: 65000, new: 70000 } ]
//! ```
//!
//! Nested values (movements, order items) are compared as a whole and
//! reported under their top-level field name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One changed field of an edited record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

impl FieldChange {
    /// `"selling_price: 65000 → 70000"` style summary for logs.
    pub fn summary(&self) -> String {
        format!("{}: {} → {}", self.field, self.old, self.new)
    }
}

/// Lists the top-level fields whose serialized value differs.
///
/// Fields are reported in key order. Fields present on only one side are
/// reported with `null` on the other.
pub fn diff<T: Serialize>(before: &T, after: &T) -> Vec<FieldChange> {
    let before = serde_json::to_value(before).unwrap_or(Value::Null);
    let after = serde_json::to_value(after).unwrap_or(Value::Null);

    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes = Vec::new();

            for (field, old_value) in &old {
                let new_value = new.get(field).cloned().unwrap_or(Value::Null);
                if *old_value != new_value {
                    changes.push(FieldChange {
                        field: field.clone(),
                        old: old_value.clone(),
                        new: new_value,
                    });
                }
            }

            for (field, new_value) in &new {
                if !old.contains_key(field) {
                    changes.push(FieldChange {
                        field: field.clone(),
                        old: Value::Null,
                        new: new_value.clone(),
                    });
                }
            }

            changes
        }
        (old, new) if old != new => vec![FieldChange {
            field: String::new(),
            old,
            new,
        }],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        name: String,
        price: i64,
        tags: Vec<String>,
    }

    #[test]
    fn test_single_field_change() {
        let before = Row {
            name: "Tea".to_string(),
            price: 250,
            tags: vec![],
        };
        let after = Row {
            price: 275,
            ..before_clone(&before)
        };

        let changes = diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "price");
        assert_eq!(changes[0].old, json!(250));
        assert_eq!(changes[0].new, json!(275));
        assert_eq!(changes[0].summary(), "price: 250 → 275");
    }

    #[test]
    fn test_nested_change_reported_at_top_level() {
        let before = Row {
            name: "Tea".to_string(),
            price: 250,
            tags: vec!["hot".to_string()],
        };
        let mut after = before_clone(&before);
        after.tags.push("new".to_string());

        let changes = diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "tags");
    }

    #[test]
    fn test_identical_records_have_no_changes() {
        let row = Row {
            name: "Tea".to_string(),
            price: 250,
            tags: vec![],
        };
        assert!(diff(&row, &before_clone(&row)).is_empty());
    }

    fn before_clone(row: &Row) -> Row {
        Row {
            name: row.name.clone(),
            price: row.price,
            tags: row.tags.clone(),
        }
    }
}
