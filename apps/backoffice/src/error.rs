//! # API Error Type
//!
//! Unified error type for page commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Back Office                        │
//! │                                                                         │
//! │  Page form submit                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ──── FieldErrors { sku: "..." } ─────┐               │  │
//! │  │         │                                        ▼               │  │
//! │  │  Missing id? ─── StoreError::NotFound ──────── ApiError ────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The dashboard shows `message` in a banner and `fields` next to the    │
//! │  matching inputs.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use backoffice_core::{CoreError, FieldErrors};
use backoffice_store::StoreError;

use crate::state::ConfigError;

/// API error returned from page commands.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "reason: reason is required",
///   "fields": { "reason": "reason is required" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages for form errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Record id already taken (409)
    Conflict,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// A form rejection carrying every field message.
    pub fn validation(fields: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: fields.to_string(),
            fields: Some(fields),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Message for one field, if this is a form rejection.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.as_ref().and_then(|f| f.get(field))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(fields: FieldErrors) -> Self {
        ApiError::validation(fields)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Duplicate { entity, id } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", entity, id),
            ),
            StoreError::Validation(fields) => ApiError::validation(fields),
            StoreError::Snapshot(e) => {
                tracing::error!("History snapshot failed: {}", e);
                ApiError::internal("Could not record history")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        StoreError::from(err).into()
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Serialization failed: {}", err);
        ApiError::internal("Could not serialize response")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
