//! Transport error type for retry classification.

use std::time::Duration;

/// Error returned by a single remote call (search or page fetch).
/// Used so we can classify and decide retries before the caller gives up.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (connection, DNS, read, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The call did not finish within the per-call timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The blocking worker running the call panicked or was cancelled.
    #[error("transport worker: {0}")]
    Worker(String),
    /// The request URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
