use ocm_core::error::ApiError;
use thiserror::Error;

/// Message shown to the user when the backend could not be reached.
pub const GENERIC_NOTICE: &str = "Could not load data from the server, please try again later";

/// A failure the user should hear about.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct Notice {
    pub message: String,
    /// What was being fetched
    pub context: String,
    pub source_error: ApiError,
}

impl Notice {
    pub fn new(context: &str, error: ApiError) -> Self {
        Self {
            message: GENERIC_NOTICE.to_string(),
            context: context.to_string(),
            source_error: error,
        }
    }
}

/// Sort a backend failure into "tell the user" or "treat as no data".
pub fn classify(context: &str, error: ApiError) -> Result<(), Notice> {
    if error.is_transient() {
        log::warn!("Fetching {} failed: {}", context, error);
        Err(Notice::new(context, error))
    } else {
        log::info!("No data for {}: {}", context, error);
        Ok(())
    }
}
