//! # Validation Module
//!
//! Input validation for every back office form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Result Type For Every Form                     │
//! │                                                                         │
//! │  Field validators (this module)                                         │
//! │  ├── validate_* / parse_*  → ValidationResult<T>                        │
//! │  └── one failed rule on one field                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  FormValidator                                                          │
//! │  ├── collects every failure of the form                                 │
//! │  └── finish() → Ok(()) | Err(FieldErrors { field → message })           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Page command → ApiError { code: VALIDATION_ERROR, fields }             │
//! │                                                                         │
//! │  No alerts, no silent no-ops: the form shows the messages per field.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::validation::{parse_quantity, validate_required, FormValidator};
//!
//! let mut form = FormValidator::new();
//! let qty = form.value(parse_quantity("quantity", "abc"));
//! form.check(validate_required("reason", ""));
//!
//! assert!(qty.is_none());
//! let errors = form.finish().unwrap_err();
//! assert_eq!(errors.get("quantity"), Some("quantity must be a number"));
//! assert_eq!(errors.get("reason"), Some("reason is required"));
//! ```

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted free-text name (product, customer, reminder title).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted search query.
pub const MAX_QUERY_LEN: usize = 100;

/// Largest quantity or count a form accepts (stock, reorder level, line
/// quantity, adjustment).
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price a form accepts, in major units.
pub const MAX_PRICE_MAJOR: i64 = 1_000_000_000;

// =============================================================================
// Form Validator
// =============================================================================

/// Accumulates field failures so a form reports all of them at once.
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: FieldErrors,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the failure, if any.
    pub fn check(&mut self, result: ValidationResult<()>) -> &mut Self {
        if let Err(err) = result {
            self.errors.push(err);
        }
        self
    }

    /// Records the failure, if any, and hands back the parsed value otherwise.
    pub fn value<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    /// Records a free-form message against a field.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.insert(field, message);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a required name-like field (non-empty, at most [`MAX_NAME_LEN`]).
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    validate_required(field, value)?;

    if value.trim().chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, numbers, hyphens, underscores
///
/// ```rust
/// use backoffice_core::validation::validate_sku;
///
/// assert!(validate_sku("RICE-5KG").is_ok());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Loose email check: one `@` with text on both sides and a dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates and trims a search query.
///
/// Empty queries are allowed (they match everything).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Values that may be zero but never negative (stock, reorder level).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Prices may be zero (free items) but never negative.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Parses a quantity typed into a form.
///
/// ## User Workflow
/// ```text
/// Stock adjustment: quantity [ 12 ]  reason [ Damaged in transit ]
///      │
///      ▼
/// parse_quantity("quantity", "12") ← THIS FUNCTION
///      │
///      ├── blank?        → "quantity is required"
///      ├── "12 boxes"?   → "quantity must be a number"
///      ├── 0 or less?    → "quantity must be positive"
///      ├── > MAX_QUANTITY → "quantity must be between 1 and 1000000000"
///      └── OK(12)
/// ```
pub fn parse_quantity(field: &str, input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let qty: i64 = input.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
    })?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    validate_at_most(field, qty, 1)?;

    Ok(qty)
}

/// Parses a whole count that may be zero (opening stock, reorder level).
pub fn parse_count(field: &str, input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let count: i64 = input.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
    })?;
    validate_non_negative(field, count)?;
    validate_at_most(field, count, 0)?;
    Ok(count)
}

/// Parses a non-negative money amount typed into a form.
pub fn parse_price(field: &str, input: &str) -> ValidationResult<Money> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let price = Money::parse_decimal(input).ok_or_else(|| ValidationError::NotNumeric {
        field: field.to_string(),
    })?;
    validate_price(field, price)?;
    if price > Money::from_major(MAX_PRICE_MAJOR) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_MAJOR,
        });
    }
    Ok(price)
}

fn validate_at_most(field: &str, value: i64, min: i64) -> ValidationResult<()> {
    if value > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
