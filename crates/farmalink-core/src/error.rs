//! # Error Types
//!
//! Domain-specific error types for farmalink-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farmalink-core errors (this file)                                     │
//! │  ├── CoreError        - Draft and domain rule violations               │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  farmalink-api errors (separate crate)                                 │
//! │  └── ApiError         - Transport / rejection / decode failures        │
//! │                                                                         │
//! │  Workbench errors (application layer)                                  │
//! │  └── FlowError        - What the view surfaces (notifications,         │
//! │                         field-level errors)                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → FlowError → notification/field    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, id, limits)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic
/// failures. They should be caught and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A draft mutation referenced a line item that is not in the draft.
    #[error("Line item not found: {0}")]
    LineItemNotFound(u64),

    /// Insufficient stock to confirm the requested quantity.
    ///
    /// Only raised for non-consignment products; consignment lines carry
    /// no stock limit.
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// The draft has reached its maximum number of lines.
    #[error("Order draft cannot have more than {max} lines")]
    DraftTooLarge { max: usize },

    /// A line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A status string from the backend did not match the known set.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
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

    /// Invalid format (e.g., malformed email, tax id, IBAN).
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
        let err = CoreError::InsufficientStock {
            code: "P-001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for P-001: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "name must be at most 100 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
