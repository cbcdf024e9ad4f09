//! Session sync orchestrator.
//!
//! One orchestrator per signed-in session. It owns the in-memory log
//! store and all gateway I/O:
//! - initial load with a best-effort pending drain and a bounded
//!   forced-refresh fallback
//! - optimistic log and config writes: local state first, one remote
//!   attempt, failures queued for the next forced sync
//! - forced full refresh that replaces local state
//!
//! Every gateway failure is converted to a degraded local state here;
//! callers never see an error. The worst outcome of a dead network is
//! stale or empty local data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use stoplog_store::LogStore;
use stoplog_types::{DeliveryLog, PaymentConfig, UserId, UserSession};
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SyncError;
use crate::gateway::{RemotePersistenceGateway, RemoteSnapshot};
use crate::retry::RetryPolicy;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No session yet; nothing loaded.
    Unauthenticated,
    /// Initial load (including the fallback retry loop) in progress.
    Loading,
    /// Local state is usable; remote may be stale.
    Ready,
    /// A forced refresh is in flight.
    Syncing,
    /// A sync attempt just failed; recovers to `Ready` immediately.
    Error,
}

/// Point-in-time view of a session, published on every transition.
#[derive(Debug, Clone)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    /// Whether this account had no stored data on its first successful
    /// load. Latched: it never flips back once the account has data.
    pub is_new_user: bool,
    /// Queued writes awaiting the next forced sync.
    pub pending_writes: usize,
    /// Most recent swallowed sync failure, cleared by the next success.
    /// This is the "could not sync" hint a UI may surface.
    pub last_error: Option<String>,
}

impl SyncStatus {
    pub fn loading(&self) -> bool {
        self.phase == SyncPhase::Loading
    }

    pub fn syncing(&self) -> bool {
        self.phase == SyncPhase::Syncing
    }

    fn initial() -> Self {
        Self {
            phase: SyncPhase::Unauthenticated,
            is_new_user: false,
            pending_writes: 0,
            last_error: None,
        }
    }
}

/// A log write whose immediate remote attempt failed, awaiting replay.
///
/// Replays save the store's current collection, so the queue carries
/// identity and bookkeeping rather than payloads: one successful full
/// save subsumes every older queued write.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    /// Client write id, for log correlation across retries.
    pub id: Uuid,
    pub queued_at: DateTime<Utc>,
}

impl PendingWrite {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            queued_at: Utc::now(),
        }
    }
}

/// Tuning knobs for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Attempt budget and backoff for the load fallback loop.
    pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
        }
    }
}

/// Mutable session state behind the orchestrator's lock.
struct SessionState {
    store: LogStore,
    phase: SyncPhase,
    is_new_user: bool,
    /// Latched once a load succeeds or the user writes data. Keeps a
    /// later empty refresh or a repeat initialization from re-flipping
    /// `is_new_user`.
    classified: bool,
    pending_writes: Vec<PendingWrite>,
    last_error: Option<String>,
}

/// Per-session sync coordinator.
///
/// Construct one at sign-in and drop it at sign-out; dropping cancels
/// any in-flight fallback timers with it. All log reads and writes go
/// through here, and no sync state outlives the session object.
pub struct SyncOrchestrator {
    session: Option<UserSession>,
    gateway: Arc<dyn RemotePersistenceGateway>,
    config: OrchestratorConfig,
    state: RwLock<SessionState>,
    /// Serializes forced refreshes. A `force_sync` arriving while one is
    /// in flight returns `false` instead of starting a second drain.
    sync_lock: Mutex<()>,
    status_tx: watch::Sender<SyncStatus>,
}

impl SyncOrchestrator {
    /// Creates an orchestrator for `session`.
    ///
    /// `None` is the no-session case: [`initialize`] completes
    /// immediately with empty state and the gateway is never called.
    /// Guest sessions behave the same except they count as signed in.
    ///
    /// [`initialize`]: SyncOrchestrator::initialize
    pub fn new(
        session: Option<UserSession>,
        gateway: Arc<dyn RemotePersistenceGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(SyncStatus::initial());
        Self {
            session,
            gateway,
            config,
            state: RwLock::new(SessionState {
                store: LogStore::default(),
                phase: SyncPhase::Unauthenticated,
                is_new_user: false,
                classified: false,
                pending_writes: Vec::new(),
                last_error: None,
            }),
            sync_lock: Mutex::new(()),
            status_tx,
        }
    }

    /// Observes status snapshots. The current value is readable
    /// immediately; a new snapshot arrives on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// Latest published status.
    pub fn status(&self) -> SyncStatus {
        self.status_tx.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.status().loading()
    }

    pub fn syncing(&self) -> bool {
        self.status().syncing()
    }

    pub fn is_new_user(&self) -> bool {
        self.status().is_new_user
    }

    /// Runs the initial load for the session.
    ///
    /// For authenticated sessions this drains writes queued by a prior
    /// offline session (best-effort), then reads logs and config
    /// directly. A failed direct read falls back to bounded
    /// forced-refresh retries; an exhausted budget leaves the session
    /// `Ready` with empty local state rather than blocking the caller.
    pub async fn initialize(&self) {
        let Some(session) = self.session.clone() else {
            debug!("no session, ready with empty state");
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Ready;
            self.publish(&state);
            return;
        };

        if session.is_guest {
            info!("guest session {}: local-only state", session.user_id);
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Ready;
            // A guest starts from nothing, so the first load trivially
            // succeeds with zero logs.
            if !state.classified {
                state.is_new_user = true;
                state.classified = true;
            }
            self.publish(&state);
            return;
        }

        {
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Loading;
            self.publish(&state);
        }

        let user = &session.user_id;

        // Writes queued while offline go first so the read below sees
        // their effects. Failure here never blocks the load.
        if let Err(e) = self.gateway.drain_pending_transactions(user).await {
            warn!("pending-transaction drain failed, continuing load: {e}");
        }

        match self.direct_read(&session).await {
            Ok((logs, config)) => {
                let mut state = self.state.write().await;
                state.store = LogStore::from_remote(logs, config);
                state.phase = SyncPhase::Ready;
                if !state.classified {
                    state.is_new_user = state.store.is_empty();
                    state.classified = true;
                }
                state.last_error = None;
                info!(
                    "load complete for {}: {} logs, new_user={}",
                    user,
                    state.store.len(),
                    state.is_new_user
                );
                self.publish(&state);
            }
            Err(e) => {
                warn!("direct read failed for {user}: {e}, entering refresh fallback");
                self.fallback_load(&session).await;
            }
        }
    }

    /// Current log collection, in insertion order.
    pub async fn logs(&self) -> Vec<DeliveryLog> {
        self.state.read().await.store.snapshot()
    }

    /// Active rate schedule.
    pub async fn payment_config(&self) -> PaymentConfig {
        self.state.read().await.store.payment_config().clone()
    }

    /// Replaces the log collection.
    ///
    /// Local state updates first and is immediately visible to readers;
    /// the single remote attempt that follows never rolls it back. A
    /// failed save is queued for the next forced sync, not retried here.
    pub async fn update_logs(&self, logs: Vec<DeliveryLog>) {
        let snapshot = {
            let mut state = self.state.write().await;
            state.store.replace_all(logs);
            if !state.store.is_empty() {
                // The account has data now; it can never be "new" again.
                state.is_new_user = false;
                state.classified = true;
            }
            self.publish(&state);
            state.store.snapshot()
        };

        let Some(session) = self.remote_session() else {
            return;
        };

        match self.gateway.save_logs(&session.user_id, &snapshot).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                if !state.pending_writes.is_empty() {
                    debug!(
                        "full save subsumed {} queued writes",
                        state.pending_writes.len()
                    );
                    state.pending_writes.clear();
                }
                state.last_error = None;
                self.publish(&state);
            }
            Err(e) => {
                let write = PendingWrite::new();
                warn!("log write {} failed, queued for next forced sync: {e}", write.id);
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.pending_writes.push(write);
                self.publish(&state);
            }
        }
    }

    /// Replaces the rate schedule, recomputing every stored total, then
    /// makes one remote save attempt. As with log writes, a failure is
    /// logged and surfaced via `last_error`, never propagated.
    pub async fn set_payment_config(&self, config: PaymentConfig) {
        {
            let mut state = self.state.write().await;
            state.store.set_payment_config(config.clone());
            self.publish(&state);
        }

        let Some(session) = self.remote_session() else {
            return;
        };

        if let Err(e) = self
            .gateway
            .save_payment_config(&session.user_id, &config)
            .await
        {
            warn!("config save failed for {}: {e}", session.user_id);
            let mut state = self.state.write().await;
            state.last_error = Some(e.to_string());
            self.publish(&state);
        }
    }

    /// Forced full refresh: replay queued writes, drain the gateway's
    /// pending transactions, then re-fetch everything and replace local
    /// state. Returns whether the refresh succeeded; the session always
    /// lands back in `Ready`.
    ///
    /// One forced sync runs at a time per session. A call arriving while
    /// another is in flight returns `false` without draining anything.
    pub async fn force_sync(&self) -> bool {
        let Some(session) = self.remote_session().cloned() else {
            // Local-only sessions have nothing to reconcile: a guest
            // refresh is a successful no-op, no session is a rejection.
            return self.session.is_some();
        };

        let Ok(_guard) = self.sync_lock.try_lock() else {
            debug!("forced sync already in flight, rejecting");
            return false;
        };

        {
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Syncing;
            self.publish(&state);
        }

        let user = &session.user_id;
        self.replay_pending_writes(user).await;

        if let Err(e) = self.gateway.drain_pending_transactions(user).await {
            warn!("pending-transaction drain failed during forced sync: {e}");
        }

        match self.gateway.force_refresh_all(user).await {
            Ok(snapshot) => {
                let mut state = self.state.write().await;
                Self::apply_snapshot(&mut state, snapshot);
                if !state.classified {
                    state.is_new_user = state.store.is_empty();
                    state.classified = true;
                }
                state.phase = SyncPhase::Ready;
                state.last_error = None;
                info!("forced sync complete for {user}: {} logs", state.store.len());
                self.publish(&state);
                true
            }
            Err(SyncError::NotFound) => {
                // Nothing stored remotely: an empty snapshot, not a failure.
                let mut state = self.state.write().await;
                state.store = LogStore::new(state.store.payment_config().clone());
                if !state.classified {
                    state.is_new_user = true;
                    state.classified = true;
                }
                state.phase = SyncPhase::Ready;
                state.last_error = None;
                self.publish(&state);
                true
            }
            Err(e) => {
                warn!("forced refresh failed for {user}: {e}");
                let mut state = self.state.write().await;
                state.phase = SyncPhase::Error;
                state.last_error = Some(e.to_string());
                self.publish(&state);
                // Non-fatal: recover to Ready with the state we had.
                state.phase = SyncPhase::Ready;
                self.publish(&state);
                false
            }
        }
    }

    /// One read of logs and config. Absent documents are first-time-user
    /// cases, not failures, and an absent config is created lazily from
    /// defaults so other devices observe the same schedule.
    async fn direct_read(
        &self,
        session: &UserSession,
    ) -> Result<(Vec<DeliveryLog>, PaymentConfig), SyncError> {
        let user = &session.user_id;

        let logs = match self.gateway.fetch_logs(user).await {
            Ok(logs) => logs,
            Err(SyncError::NotFound) => Vec::new(),
            Err(e) => return Err(e),
        };

        let config = match self.gateway.fetch_payment_config(user).await {
            Ok(config) => config,
            Err(SyncError::NotFound) => {
                let defaults = PaymentConfig::default();
                if let Err(e) = self.gateway.save_payment_config(user, &defaults).await {
                    warn!("could not materialize default config for {user}: {e}");
                }
                defaults
            }
            Err(e) => return Err(e),
        };

        Ok((logs, config))
    }

    /// Bounded forced-refresh retry loop after a failed direct read.
    async fn fallback_load(&self, session: &UserSession) {
        let user = &session.user_id;
        let policy = self.config.retry;

        for attempt in 1..=policy.max_attempts {
            match self.gateway.force_refresh_all(user).await {
                Ok(snapshot) => {
                    let mut state = self.state.write().await;
                    Self::apply_snapshot(&mut state, snapshot);
                    state.phase = SyncPhase::Ready;
                    if !state.classified {
                        state.is_new_user = state.store.is_empty();
                        state.classified = true;
                    }
                    state.last_error = None;
                    info!(
                        "fallback refresh succeeded on attempt {attempt} for {user}: {} logs",
                        state.store.len()
                    );
                    self.publish(&state);
                    return;
                }
                Err(SyncError::NotFound) => {
                    // Nothing stored at all: a brand-new account.
                    let mut state = self.state.write().await;
                    state.store = LogStore::default();
                    state.phase = SyncPhase::Ready;
                    if !state.classified {
                        state.is_new_user = true;
                        state.classified = true;
                    }
                    state.last_error = None;
                    self.publish(&state);
                    return;
                }
                Err(e) => {
                    warn!("fallback refresh attempt {attempt} failed for {user}: {e}");
                    let mut state = self.state.write().await;
                    state.last_error = Some(e.to_string());
                    self.publish(&state);
                    drop(state);
                    if let Some(delay) = policy.delay_after(attempt) {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        // Budget spent. Degrade to empty state so the caller is never
        // stuck loading; the session stays unclassified so the first
        // successful forced sync can still decide is_new_user.
        let mut state = self.state.write().await;
        state.store = LogStore::default();
        state.phase = SyncPhase::Ready;
        self.publish(&state);
        warn!(
            "load degraded to empty state for {user} after {} attempts",
            policy.max_attempts
        );
    }

    /// Re-attempts queued writes by saving the current collection. The
    /// in-memory store is the source of truth, so one full save covers
    /// every queued mutation.
    async fn replay_pending_writes(&self, user: &UserId) {
        let (snapshot, queued) = {
            let state = self.state.read().await;
            if state.pending_writes.is_empty() {
                return;
            }
            (state.store.snapshot(), state.pending_writes.len())
        };

        match self.gateway.save_logs(user, &snapshot).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.pending_writes.clear();
                self.publish(&state);
                info!("replayed {queued} queued writes for {user}");
            }
            Err(e) => {
                warn!("queued-write replay failed for {user}, keeping {queued} writes: {e}");
            }
        }
    }

    /// The session when its data should reach remote persistence.
    fn remote_session(&self) -> Option<&UserSession> {
        self.session.as_ref().filter(|s| !s.is_guest)
    }

    fn apply_snapshot(state: &mut SessionState, snapshot: RemoteSnapshot) {
        let config = snapshot
            .payment_config
            .unwrap_or_else(|| state.store.payment_config().clone());
        state.store = LogStore::from_remote(snapshot.logs, config);
    }

    fn publish(&self, state: &SessionState) {
        self.status_tx.send_replace(SyncStatus {
            phase: state.phase,
            is_new_user: state.is_new_user,
            pending_writes: state.pending_writes.len(),
            last_error: state.last_error.clone(),
        });
    }
}

/// Creates an orchestrator and a status receiver for the caller's UI or
/// shell layer. The receiver observes every state transition.
pub fn create_orchestrator(
    session: Option<UserSession>,
    gateway: Arc<dyn RemotePersistenceGateway>,
    config: OrchestratorConfig,
) -> (Arc<SyncOrchestrator>, watch::Receiver<SyncStatus>) {
    let orchestrator = Arc::new(SyncOrchestrator::new(session, gateway, config));
    let status_rx = orchestrator.subscribe();
    (orchestrator, status_rx)
}
