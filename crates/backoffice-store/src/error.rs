//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  FieldErrors / CoreError (backoffice-core)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← missing ids, duplicate ids                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the app) ← Serialized for the dashboard                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoffice_core::{CoreError, FieldErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record with this id already exists.
    #[error("Duplicate {entity}: '{id}' already exists")]
    Duplicate { entity: String, id: String },

    /// Input rejected before it reached the records.
    #[error("{0}")]
    Validation(#[from] FieldErrors),

    /// A record could not be turned into a history snapshot.
    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert core errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// CoreError::NotFound            → StoreError::NotFound
/// CoreError::Validation          → StoreError::Validation
/// CoreError::PageSizeNotAllowed  → StoreError::Validation (field "page_size")
/// ```
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            CoreError::Validation(errors) => StoreError::Validation(errors),
            other @ CoreError::PageSizeNotAllowed { .. } => {
                let mut errors = FieldErrors::new();
                errors.insert("page_size", other.to_string());
                StoreError::Validation(errors)
            }
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
