use stoplog_earnings::{base_earnings, compute_total, round2};
use stoplog_types::PaymentConfig;

fn default_config() -> PaymentConfig {
    PaymentConfig::default()
}

// --- Tier scenarios ---

#[test]
fn hundred_stops_below_cutoff() {
    let total = compute_total(100, 0.0, &default_config());
    assert_eq!(total, 198.00);
}

#[test]
fn hundred_twenty_stops_spans_both_tiers() {
    // 110 * 1.98 + 10 * 1.48 = 217.80 + 14.80
    let total = compute_total(120, 0.0, &default_config());
    assert_eq!(total, 232.60);
}

#[test]
fn extra_is_added_on_top() {
    let total = compute_total(100, 15.25, &default_config());
    assert_eq!(total, 213.25);
}

// --- Cutoff boundary ---

#[test]
fn stops_exactly_at_cutoff() {
    // All 110 counted stops price at the before rate; the after rate
    // applies from the cutoff-indexed stop onward, so the beyond-cutoff
    // portion here is empty.
    let total = compute_total(110, 0.0, &default_config());
    assert_eq!(total, 217.80);
}

#[test]
fn one_stop_past_cutoff_earns_after_rate() {
    // 217.80 + 1.48
    let total = compute_total(111, 0.0, &default_config());
    assert_eq!(total, 219.28);
}

#[test]
fn last_stop_before_cutoff_earns_before_rate() {
    // 109 * 1.98; one stop later the total grows by 1.98, not 1.48
    let total = compute_total(109, 0.0, &default_config());
    assert_eq!(total, 215.82);
}

// --- Degenerate inputs ---

#[test]
fn zero_stops_zero_extra_is_zero() {
    assert_eq!(compute_total(0, 0.0, &default_config()), 0.0);
}

#[test]
fn zero_stops_still_pays_extra() {
    assert_eq!(compute_total(0, 42.5, &default_config()), 42.50);
}

#[test]
fn negative_extra_is_clamped_to_zero() {
    let config = default_config();
    assert_eq!(
        compute_total(50, -10.0, &config),
        compute_total(50, 0.0, &config)
    );
}

#[test]
fn base_earnings_is_zero_for_zero_stops() {
    assert_eq!(base_earnings(0, &default_config()), 0.0);
}

// --- Rounding ---

#[test]
fn round2_keeps_two_decimals() {
    assert_eq!(round2(1.984), 1.98);
    assert_eq!(round2(1.986), 1.99);
}

#[test]
fn round2_rounds_halves_up() {
    // 0.125 is exact in binary, so 12.5 cents is a true halfway case.
    // Half-up gives 13 cents; banker's rounding would give 12.
    assert_eq!(round2(0.125), 0.13);
}

#[test]
fn half_cent_extra_rounds_up_in_totals() {
    assert_eq!(compute_total(0, 0.125, &default_config()), 0.13);
}

#[test]
fn round2_identity_on_already_rounded() {
    assert_eq!(round2(232.60), 232.60);
    assert_eq!(round2(0.0), 0.0);
}
