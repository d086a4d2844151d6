//! Monitor errors.

use thiserror::Error;

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A reachability attempt failed.
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    /// HTTP client could not be built or a request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Two targets share a name.
    #[error("Duplicate target name: {0}")]
    DuplicateTarget(String),

    /// Message delivery failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}
