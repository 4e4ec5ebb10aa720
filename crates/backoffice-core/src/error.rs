//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                           │
//! │  ├── ValidationError  - One failed rule on one field                    │
//! │  └── FieldErrors      - Every failed rule of a form, field → message    │
//! │                                                                         │
//! │  backoffice-store errors (separate crate)                               │
//! │  └── StoreError       - Repository operation failures                   │
//! │                                                                         │
//! │  App errors                                                             │
//! │  └── ApiError         - What the dashboard sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → StoreError → ApiError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, etc.)
//! 3. Every form reports all of its failures at once, keyed by field

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record cannot be found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A page size outside the configured option list was requested.
    #[error("Page size {requested} is not one of {allowed:?}")]
    PageSizeNotAllowed { requested: usize, allowed: Vec<usize> },

    /// Form validation failed (wraps FieldErrors).
    #[error("Validation error: {0}")]
    Validation(#[from] FieldErrors),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single input validation failure.
///
/// These errors occur when user input doesn't meet requirements.
/// Forms collect them into [`FieldErrors`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Free text was supplied where a number is expected.
    #[error("{field} must be a number")]
    NotNumeric { field: String },

    /// Invalid format (e.g., invalid date, invalid SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date lies after today.
    #[error("{field} cannot be in the future")]
    InFuture { field: String },

    /// The start of a date range lies after its end.
    #[error("Start date must be before end date")]
    StartAfterEnd,

    /// A derived amount (stock value, order total) would not fit.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Requested amount exceeds what is available.
    #[error("{field} cannot exceed {available}")]
    Exceeds { field: String, available: i64 },
}

impl ValidationError {
    /// The form field this failure belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::NotNumeric { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InFuture { field }
            | ValidationError::TooLarge { field }
            | ValidationError::Exceeds { field, .. } => field,
            ValidationError::StartAfterEnd => "from",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// All validation failures of one form, keyed by field name.
///
/// The first failure recorded for a field wins; later ones for the same
/// field are dropped so the form shows one message per input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field unless one is already present.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Records a [`ValidationError`] under its own field name.
    pub fn push(&mut self, err: ValidationError) {
        let field = err.field().to_string();
        self.insert(field, err.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(err);
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
