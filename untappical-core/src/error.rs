//! Error types for untappical.

use thiserror::Error;

/// Errors that can occur while building a user's check-in calendar.
#[derive(Error, Debug)]
pub enum UntappicalError {
    #[error("Feed request failed: {0}")]
    Feed(String),

    #[error("Untappd API error ({code}): {detail}")]
    Api { code: u16, detail: String },

    #[error("Invalid check-in {id}: {reason}")]
    InvalidCheckin { id: String, reason: String },
}

/// Result type alias for untappical operations.
pub type UntappicalResult<T> = Result<T, UntappicalError>;
