//! Error types for reverse-geocoding clients.

use thiserror::Error;

/// Errors that can occur when reverse-geocoding a coordinate.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// JSON deserialization failed.
    #[error("Failed to parse response: {0}")]
    JsonError(String),

    /// The geocoder refused the request for quota reasons (429, or 403 for
    /// usage-policy blocks).
    #[error("Geocoder throttled the request (status {0})")]
    Throttled(u16),

    /// Any other non-200 status.
    #[error("Unexpected status {0} from geocoder")]
    BadStatus(u16),
}

impl GeocodeError {
    /// True when the error is a quota rejection rather than an ordinary
    /// failure.
    pub fn is_throttled(&self) -> bool {
        matches!(self, GeocodeError::Throttled(_))
    }
}
