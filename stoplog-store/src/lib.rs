//! In-memory delivery-log storage.
//!
//! One `LogStore` per active session holds that user's daily logs and the
//! active payment config, and keeps every derived `total` in sync. The
//! store is plain owned state; the sync layer decides when its contents
//! reach remote persistence.

mod log_store;

pub use log_store::LogStore;
