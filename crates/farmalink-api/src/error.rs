//! # API Error Types
//!
//! The error taxonomy for backend communication.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Failure Classes                                      │
//! │                                                                         │
//! │  reqwest send() fails ──────────────► ApiError::Transport               │
//! │    (refused, DNS, timeout)             generic danger notification      │
//! │                                                                         │
//! │  body parses, success == false ─────► ApiError::Rejected                │
//! │    ({success: false, message})         message shown verbatim           │
//! │                                                                         │
//! │  body does not parse ───────────────► ApiError::Decode                  │
//! │    (unexpected shape)                  generic danger notification      │
//! │                                                                         │
//! │  None of these is retried automatically. Recovery is a user action     │
//! │  (click search/submit again).                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS failure,
    /// timeout. The backend may not even have seen it.
    #[error("request to backend failed: {0}")]
    Transport(reqwest::Error),

    /// The backend processed the request and rejected it with a
    /// `{success: false, message}` envelope. The message is meant for
    /// the user and is surfaced verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// The response arrived but was not the expected shape.
    #[error("could not decode backend response: {0}")]
    Decode(reqwest::Error),

    /// The configured base URL (or a path joined onto it) is invalid.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the HTTP client from configuration failed.
    #[error("API client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for failures where the backend never gave an answer
    /// (transport and decode) - callers show a generic message for these
    /// instead of surfacing internals.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }
}

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_verbatim() {
        let err = ApiError::Rejected {
            message: "Stock insuficiente para Ibuprofeno 600".to_string(),
        };
        assert_eq!(err.to_string(), "Stock insuficiente para Ibuprofeno 600");
        assert!(!err.is_infrastructure());
    }
}
