/// Error types for ocm core operations
use thiserror::Error;

/// Invalid domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Resolution level outside 1..=3
    #[error("Invalid resolution level: {0} (expected 1, 2 or 3)")]
    InvalidResolution(i64),

    /// Bounds whose minimum exceeds their maximum on some axis
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
}

/// Failures talking to the backend.
///
/// `Transient` and `Status` are surfaced to the user as a generic notice;
/// `EmptyOrMalformed` is treated as "no data for this request".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Transient(String),

    /// Non-success HTTP status
    #[error("Server responded with status {0}")]
    Status(u16),

    /// 2xx response that is empty, reports failure, or is missing fields
    #[error("Empty or malformed response: {0}")]
    EmptyOrMalformed(String),
}

impl ApiError {
    /// Whether the failure should be reported to the user.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient(_) | ApiError::Status(_))
    }
}
