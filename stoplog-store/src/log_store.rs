//! The in-memory log store.

use chrono::NaiveDate;
use std::ops::RangeInclusive;
use stoplog_earnings::{compute_total, round2};
use stoplog_types::{DeliveryLog, LogId, PaymentConfig};

/// In-memory collection of one user's daily delivery logs.
///
/// Invariants:
/// - at most one log per calendar date;
/// - every `total` equals the calculator output for the log's stops and
///   extra under the active config.
///
/// The sequence keeps insertion order as received. Consumers that need
/// chronological order must sort explicitly (`sorted_by_date`).
#[derive(Debug, Clone)]
pub struct LogStore {
    logs: Vec<DeliveryLog>,
    config: PaymentConfig,
}

impl LogStore {
    /// Creates an empty store with the given rate schedule.
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            logs: Vec::new(),
            config,
        }
    }

    /// Builds a store from a fetched collection, recomputing every total.
    ///
    /// Totals arriving from remote documents are distrusted and replaced
    /// with the calculator output under `config`.
    pub fn from_remote(logs: Vec<DeliveryLog>, config: PaymentConfig) -> Self {
        let mut store = Self::new(config);
        store.replace_all(logs);
        store
    }

    /// Inserts `log` or replaces the existing log sharing its date.
    ///
    /// Replacement overwrites every data field but keeps the previously
    /// assigned id, so `remove` stays stable across resubmits. Returns the
    /// id actually stored. `total` is recomputed either way.
    pub fn upsert(&mut self, mut log: DeliveryLog) -> LogId {
        log.total = compute_total(log.stops, log.extra, &self.config);
        if let Some(existing) = self.logs.iter_mut().find(|e| e.date == log.date) {
            log.id = existing.id;
            let id = log.id;
            *existing = log;
            id
        } else {
            let id = log.id;
            self.logs.push(log);
            id
        }
    }

    /// Deletes by id. Returns whether anything was removed; a missing id
    /// is a no-op, not an error.
    pub fn remove(&mut self, id: &LogId) -> bool {
        let before = self.logs.len();
        self.logs.retain(|log| log.id != *id);
        self.logs.len() != before
    }

    /// Replaces the active rate schedule and recomputes every stored
    /// total. Stops, extra, dates and ids are untouched.
    ///
    /// Recomputed totals reach remote persistence only when the logs are
    /// next saved; historical documents are not rewritten here.
    pub fn set_payment_config(&mut self, config: PaymentConfig) {
        self.config = config;
        for log in &mut self.logs {
            log.total = compute_total(log.stops, log.extra, &self.config);
        }
    }

    pub fn payment_config(&self) -> &PaymentConfig {
        &self.config
    }

    /// Replaces the whole collection, preserving the incoming order.
    /// A later duplicate of a date wins over an earlier one.
    pub fn replace_all(&mut self, logs: Vec<DeliveryLog>) {
        self.logs.clear();
        for log in logs {
            self.upsert(log);
        }
    }

    pub fn get(&self, id: &LogId) -> Option<&DeliveryLog> {
        self.logs.iter().find(|log| log.id == *id)
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Option<&DeliveryLog> {
        self.logs.iter().find(|log| log.date == date)
    }

    /// All logs in insertion order.
    pub fn logs(&self) -> &[DeliveryLog] {
        &self.logs
    }

    /// Owned copy of the collection, insertion order.
    pub fn snapshot(&self) -> Vec<DeliveryLog> {
        self.logs.clone()
    }

    /// Last `n` logs in insertion order.
    ///
    /// Insertion order is not guaranteed to be chronological; use
    /// `sorted_by_date` when display order matters.
    pub fn recent(&self, n: usize) -> &[DeliveryLog] {
        let start = self.logs.len().saturating_sub(n);
        &self.logs[start..]
    }

    /// Chronological projection, oldest first.
    pub fn sorted_by_date(&self) -> Vec<DeliveryLog> {
        let mut sorted = self.logs.clone();
        sorted.sort_by_key(|log| log.date);
        sorted
    }

    /// Lazy, restartable sequence of logs matching `predicate`. Pure:
    /// cloning the iterator (or calling again) restarts the walk.
    pub fn query<P>(&self, predicate: P) -> impl Iterator<Item = &DeliveryLog> + Clone
    where
        P: Fn(&DeliveryLog) -> bool + Clone,
    {
        self.logs.iter().filter(move |&log| predicate(log))
    }

    /// Logs whose date falls within `range` (inclusive), insertion order.
    pub fn in_date_range(
        &self,
        range: RangeInclusive<NaiveDate>,
    ) -> impl Iterator<Item = &DeliveryLog> + Clone {
        self.query(move |log| range.contains(&log.date))
    }

    /// Sum of stored totals, rounded to cents.
    pub fn total_earnings(&self) -> f64 {
        round2(self.logs.iter().map(|log| log.total).sum())
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(PaymentConfig::default())
    }
}
