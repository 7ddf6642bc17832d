//! Error types for the queue service client.

use thiserror::Error;

/// Errors that can occur when fetching from the queue service.
///
/// Every variant is fatal for the paginated run that hit it; only
/// [`FetchError::Throttled`] is recoverable at the orchestration level,
/// and only during the near-region phase.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// HTTP request failed before a status arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The service answered 429.
    #[error("Queue service throttled the request")]
    Throttled,

    /// Any other non-200 status.
    #[error("Queue service returned status {0}")]
    BadStatus(u16),

    /// The payload did not decode as a queue page.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The run was cancelled by a newer query.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// True when the error is the service's rate limiter pushing back.
    pub fn is_throttled(&self) -> bool {
        matches!(self, FetchError::Throttled)
    }
}
