//! Daily delivery log entries.

use crate::LogId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's delivery record for a single user.
///
/// The `date` is the natural key: a user has at most one log per date, and
/// resubmitting a date replaces the existing entry wholesale. `total` is
/// derived from `stops`, `extra` and the active payment config; the store
/// recomputes it and it is never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLog {
    pub id: LogId,
    /// Calendar date (ISO 8601). At most one log per (user, date).
    pub date: NaiveDate,
    /// Number of deliveries completed that day.
    pub stops: u32,
    /// Flat monetary adjustment on top of the tiered base.
    #[serde(default)]
    pub extra: f64,
    #[serde(default)]
    pub notes: Option<String>,
    /// Derived earnings for the day. Values arriving from remote documents
    /// are distrusted and recomputed on load.
    #[serde(default)]
    pub total: f64,
}

impl DeliveryLog {
    /// Creates a log for `date` with a fresh id and zero adjustments.
    /// The store assigns `total` when the log is upserted.
    pub fn new(date: NaiveDate, stops: u32) -> Self {
        Self {
            id: LogId::new(),
            date,
            stops,
            extra: 0.0,
            notes: None,
            total: 0.0,
        }
    }

    pub fn with_extra(mut self, extra: f64) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
