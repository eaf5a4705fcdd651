//! # Error Types
//!
//! Domain-specific error types for coop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coop-core errors (this file)                                          │
//! │  ├── CoreError        - Reference data and amount failures             │
//! │  └── ValidationError  - Request validation failures                    │
//! │                                                                         │
//! │  coop-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An embedded reference data resource could not be parsed.
    ///
    /// ## When This Occurs
    /// - `currencies.json` / `bill_and_coins.json` / `holidays.json` was
    ///   edited into an invalid shape
    #[error("Invalid reference data in {resource}: {reason}")]
    ReferenceData { resource: String, reason: String },

    /// A holiday template does not name a real calendar day for the year.
    #[error("Invalid holiday date {month}/{day} for year {year} ({name})")]
    InvalidHolidayDate {
        name: String,
        year: i32,
        month: u32,
        day: u32,
    },

    /// A decimal amount could not be parsed.
    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Request validation errors.
///
/// Raised by the `Validate` implementations on request types before a
/// request is turned into an entity.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value must have an exact length.
    #[error("{field} must be exactly {len} characters")]
    ExactLength { field: String, len: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidHolidayDate {
            name: "Leap Day".to_string(),
            year: 2025,
            month: 2,
            day: 29,
        };
        assert_eq!(
            err.to_string(),
            "Invalid holiday date 2/29 for year 2025 (Leap Day)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::ExactLength {
            field: "iso_3166_alpha3".to_string(),
            len: 3,
        };
        assert_eq!(err.to_string(), "iso_3166_alpha3 must be exactly 3 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "currency_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
