//! Core data model for the stoplog workspace.
//!
//! Shared types with no behavior of their own:
//! - Identifier newtypes (`LogId`, `UserId`)
//! - The daily `DeliveryLog` record
//! - The tiered `PaymentConfig` rate schedule
//! - The `UserSession` identity handle

mod config;
mod ids;
mod log;
mod session;

pub use config::PaymentConfig;
pub use ids::{LogId, ParseLogIdError, UserId};
pub use log::DeliveryLog;
pub use session::UserSession;
