//! Offline-tolerant sync engine for stoplog.
//!
//! Provides:
//! - [`RemotePersistenceGateway`], the contract the core depends on
//! - [`RetryPolicy`], bounded backoff for load fallbacks
//! - [`SyncOrchestrator`], the per-session lifecycle state machine
//! - [`RestGateway`], an HTTP reference implementation of the contract
//!
//! The orchestrator is deliberately pessimistic about networks and
//! optimistic about local state: every remote failure degrades to
//! usable in-memory data instead of an error.

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod rest;
pub mod retry;

pub use error::{SyncError, SyncResult};
pub use gateway::{RemotePersistenceGateway, RemoteSnapshot};
pub use orchestrator::{
    OrchestratorConfig, PendingWrite, SyncOrchestrator, SyncPhase, SyncStatus, create_orchestrator,
};
pub use rest::{RestGateway, RestGatewayConfig};
pub use retry::{Backoff, RetryPolicy};
