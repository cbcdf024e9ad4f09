//! The remote persistence contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stoplog_types::{DeliveryLog, PaymentConfig, UserId};

use crate::error::SyncResult;

/// Combined result of a forced full refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub logs: Vec<DeliveryLog>,
    /// Absent when the user has never stored a rate schedule.
    #[serde(default)]
    pub payment_config: Option<PaymentConfig>,
}

/// Capability the sync layer needs from remote persistence.
///
/// The crate ships an HTTP reference implementation, [`RestGateway`];
/// tests substitute scripted fakes. Reads signal an absent document with
/// [`SyncError::NotFound`], which the orchestrator maps to
/// first-time-user semantics rather than a failure.
///
/// [`RestGateway`]: crate::rest::RestGateway
/// [`SyncError::NotFound`]: crate::error::SyncError::NotFound
#[async_trait]
pub trait RemotePersistenceGateway: Send + Sync {
    /// Fetches the full log collection for `user`.
    async fn fetch_logs(&self, user: &UserId) -> SyncResult<Vec<DeliveryLog>>;

    /// Fetches the user's rate schedule.
    async fn fetch_payment_config(&self, user: &UserId) -> SyncResult<PaymentConfig>;

    /// Persists the full log collection.
    async fn save_logs(&self, user: &UserId, logs: &[DeliveryLog]) -> SyncResult<()>;

    /// Persists the rate schedule.
    async fn save_payment_config(&self, user: &UserId, config: &PaymentConfig) -> SyncResult<()>;

    /// Pushes through writes the service queued while the client was
    /// offline. Best-effort and idempotent; callers tolerate failure.
    async fn drain_pending_transactions(&self, user: &UserId) -> SyncResult<()>;

    /// Bypasses caches and re-reads everything in one shot.
    async fn force_refresh_all(&self, user: &UserId) -> SyncResult<RemoteSnapshot>;
}
