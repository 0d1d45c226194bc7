//! Error taxonomy for view-level operations.
//!
//! Only root lookups surface errors. Failures below the root prune the
//! affected branch inside the resolver and never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HnError {
    /// The root lookup returned nothing, or an item of the wrong type.
    #[error("item {0} not found")]
    NotFound(u32),

    /// The underlying lookup failed (connection, status, body).
    #[error("request failed: {0:#}")]
    Transport(#[source] anyhow::Error),

    /// The identifier could not be parsed; no lookup was attempted.
    #[error("invalid story id: {0:?}")]
    InvalidInput(String),
}

impl HnError {
    /// Every variant except bad input can succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}

pub type HnResult<T> = std::result::Result<T, HnError>;

/// Parse a user-supplied story identifier.
pub fn parse_story_id(raw: &str) -> HnResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| HnError::InvalidInput(raw.to_string()))
}
