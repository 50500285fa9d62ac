//! Error taxonomy for backend API calls.

/// All errors that can be returned by an API operation.
///
/// Every failure is a value handed back to the caller — nothing in this
/// crate panics on a bad response, and nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before any request was sent (empty reference
    /// fields, malformed email, short password).
    #[error("{message}")]
    Validation { message: String },

    /// The backend answered with a non-2xx status. `message` carries the
    /// backend-supplied `message` (and `error` detail when present), or
    /// a status-derived fallback when the body was not JSON.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request never completed: connection failure, timeout, or an
    /// unreadable response stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body failed shape validation.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }
}
