//! # Flow Error Type
//!
//! Unified error type for controller operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How Failures Reach the User                             │
//! │                                                                         │
//! │  FlowError::Validation ──► field-level error (form stays put),         │
//! │                            or a danger notification for form-wide       │
//! │                            rules - the request never leaves the client  │
//! │                                                                         │
//! │  FlowError::Busy ────────► ignored: the triggering control is           │
//! │                            disabled, a second activation is a no-op     │
//! │                                                                         │
//! │  FlowError::Api ─────────► transport/decode: generic danger message     │
//! │                            rejection: backend message verbatim          │
//! │                                                                         │
//! │  FlowError::Core ────────► danger notification with the rule that       │
//! │                            was violated (e.g. insufficient stock)       │
//! │                                                                         │
//! │  Nothing is retried automatically. The form stays editable after       │
//! │  every failure so the user can correct and resubmit.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use farmalink_api::ApiError;
use farmalink_core::{CoreError, ValidationError};

/// Errors surfaced by controller operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Client-side validation failed; no request was issued.
    ///
    /// When `field` is set, the view highlights that input in place;
    /// otherwise the message is shown as a danger notification.
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    /// The operation's control is busy (a submission is in flight).
    #[error("operation already in flight")]
    Busy,

    /// Domain rule violation from farmalink-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Backend interaction failure from farmalink-api.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FlowError {
    /// Field-level validation failure.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        FlowError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Form-wide validation failure.
    pub fn form(message: impl Into<String>) -> Self {
        FlowError::Validation {
            field: None,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        FlowError::Core(CoreError::Validation(err))
    }
}

/// A field-level validation finding for entity forms.
///
/// Directory forms validate all fields at once and hand the full list to
/// the view, which highlights each offending input in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Which form input is wrong.
    pub field: &'static str,
    /// The message rendered next to it.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_carries_location() {
        let err = FlowError::field("client", "Debe seleccionar un cliente");
        match err {
            FlowError::Validation { field, message } => {
                assert_eq!(field, Some("client"));
                assert_eq!(message, "Debe seleccionar un cliente");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_rejection_message_passes_through() {
        let err = FlowError::from(ApiError::Rejected {
            message: "Cliente no encontrado".to_string(),
        });
        assert_eq!(err.to_string(), "Cliente no encontrado");
    }
}
