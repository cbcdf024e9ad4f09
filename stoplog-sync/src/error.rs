//! Sync error types.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures crossing the remote persistence boundary.
///
/// Every variant is caught inside the orchestrator and converted to a
/// degraded local state; none of them reaches callers as a fault.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network-level failure that a retry with backoff could clear.
    #[error("transient network failure: {0}")]
    Transient(String),

    /// The remote document does not exist. For log and config reads this
    /// means "first-time user", not a fault.
    #[error("remote document not found")]
    NotFound,

    /// The remote store rejected or could not complete an operation.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// No authenticated user; remote operations are skipped entirely.
    #[error("no authenticated session")]
    SessionAbsent,
}

impl SyncError {
    /// True when waiting and retrying could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transient(_))
    }

    /// True when the failure is just an absent document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound)
    }
}
