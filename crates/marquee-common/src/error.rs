//! Common error type used throughout marquee.
//!
//! Covers the failures surfaced to callers from shared types: bad input
//! (unknown category names) and missing catalog entries.

/// Common error type for marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entry was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}
