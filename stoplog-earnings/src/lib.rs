//! Tiered earnings math.
//!
//! Pure functions only: a stop count and a rate schedule go in, a rounded
//! monetary total comes out. No I/O, no state, no error conditions.

use stoplog_types::PaymentConfig;

/// Computes the earnings total for one day.
///
/// Stops below the cutoff earn `rate_before_cutoff`; the cutoff stop and
/// everything after it earn `rate_after_cutoff`. `extra` is added flat; a
/// negative value is clamped to zero rather than rejected. The result is
/// rounded to 2 decimal places, half-up.
pub fn compute_total(stops: u32, extra: f64, config: &PaymentConfig) -> f64 {
    let extra = extra.max(0.0);
    round2(base_earnings(stops, config) + extra)
}

/// Unrounded tiered base for `stops` deliveries.
pub fn base_earnings(stops: u32, config: &PaymentConfig) -> f64 {
    let cutoff = config.cutoff_point;
    if stops == 0 {
        0.0
    } else if stops < cutoff {
        stops as f64 * config.rate_before_cutoff
    } else {
        cutoff as f64 * config.rate_before_cutoff
            + (stops - cutoff) as f64 * config.rate_after_cutoff
    }
}

/// Rounds a monetary value to 2 decimal places, half-up.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
