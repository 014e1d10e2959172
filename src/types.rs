//! Shared error and result types for signpost

use thiserror::Error;

/// Errors surfaced by signpost's library API.
///
/// Network-level failures inside the resolution flow are absorbed into
/// fallback branches and never reach this type; it covers configuration,
/// persistence and construction failures.
#[derive(Debug, Error)]
pub enum SignpostError {
    /// Invalid or inconsistent configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Key-value store could not be opened or written
    #[error("store error: {0}")]
    Store(String),

    /// HTTP client construction or request failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be parsed
    #[error("invalid url: {0}")]
    Url(String),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SignpostError>;
