//! Per-user rate schedule.

use serde::{Deserialize, Serialize};

/// Tiered per-stop rate schedule.
///
/// Stops indexed `[0, cutoff_point)` earn `rate_before_cutoff`; stops from
/// `cutoff_point` onward earn `rate_after_cutoff`. Tier 2 starts at the
/// cutoff, not after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Stop-count threshold where the per-stop rate changes.
    pub cutoff_point: u32,
    /// Rate per stop below the cutoff.
    pub rate_before_cutoff: f64,
    /// Rate per stop at and beyond the cutoff.
    pub rate_after_cutoff: f64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            cutoff_point: 110,
            rate_before_cutoff: 1.98,
            rate_after_cutoff: 1.48,
        }
    }
}
