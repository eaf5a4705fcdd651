//! # Validation Module
//!
//! Request validation for the back-office entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request types (Rust)                                          │
//! │  ├── Deserialization (types, UUID / decimal formats)                    │
//! │  └── THIS MODULE: required fields, lengths, positive amounts            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (currency code, denomination per branch)        │
//! │  └── Foreign key constraints (RESTRICT / CASCADE / SET NULL)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes: symbols such as `₱` and
//! flag emoji are multi-byte.
//!
//! ## Usage
//! ```rust
//! use coop_core::validation::{length_between, exact_len_optional};
//!
//! assert!(length_between("currency_code", "PHP", 2, 10).is_ok());
//! assert!(exact_len_optional("iso_3166_alpha2", "", 2).is_ok());
//! assert!(exact_len_optional("iso_3166_alpha2", "PHL", 2).is_err());
//! ```

use uuid::Uuid;

use crate::amount::Amount;
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Implemented by request types.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

// =============================================================================
// String Validators
// =============================================================================

/// Fails when `value` is empty after trimming.
pub fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Required, and between `min` and `max` characters.
///
/// ## Example
/// ```rust
/// use coop_core::validation::length_between;
///
/// assert!(length_between("name", "Philippine Peso", 1, 255).is_ok());
/// assert!(length_between("name", "", 1, 255).is_err());
/// ```
pub fn length_between(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    required(field, value)?;

    let len = value.trim().chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Optional field with an upper bound.
pub fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Optional field that, when present, must be exactly `len` characters.
pub fn exact_len_optional(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    if value.chars().count() != len {
        return Err(ValidationError::ExactLength {
            field: field.to_string(),
            len,
        });
    }
    Ok(())
}

// =============================================================================
// Identifier / Amount Validators
// =============================================================================

/// A required foreign key. The nil UUID counts as missing.
pub fn required_id(field: &str, id: Uuid) -> ValidationResult<()> {
    if id.is_nil() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Amount must be greater than zero.
pub fn positive_amount(field: &str, amount: Amount) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use coop_core::validation::parse_uuid;
///
/// assert!(parse_uuid("branch_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(parse_uuid("branch_id", "not-a-uuid").is_err());
/// ```
pub fn parse_uuid(field: &str, id: &str) -> ValidationResult<Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
