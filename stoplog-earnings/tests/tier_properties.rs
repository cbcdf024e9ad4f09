use proptest::prelude::*;
use stoplog_earnings::{compute_total, round2};
use stoplog_types::PaymentConfig;

proptest! {
    #[test]
    fn below_cutoff_prices_every_stop_at_before_rate(
        stops in 0u32..110,
        extra in 0.0f64..500.0,
    ) {
        let config = PaymentConfig::default();
        let expected = round2(stops as f64 * config.rate_before_cutoff + extra);
        prop_assert_eq!(compute_total(stops, extra, &config), expected);
    }

    #[test]
    fn at_or_beyond_cutoff_prices_the_tail_at_after_rate(
        stops in 110u32..2000,
        extra in 0.0f64..500.0,
    ) {
        let config = PaymentConfig::default();
        let expected = round2(
            config.cutoff_point as f64 * config.rate_before_cutoff
                + (stops - config.cutoff_point) as f64 * config.rate_after_cutoff
                + extra,
        );
        prop_assert_eq!(compute_total(stops, extra, &config), expected);
    }

    #[test]
    fn tier_split_holds_for_any_schedule(
        stops in 0u32..500,
        cutoff in 1u32..300,
        before in 0.0f64..5.0,
        after in 0.0f64..5.0,
    ) {
        let config = PaymentConfig {
            cutoff_point: cutoff,
            rate_before_cutoff: before,
            rate_after_cutoff: after,
        };
        let expected = if stops == 0 {
            0.0
        } else if stops < cutoff {
            round2(stops as f64 * before)
        } else {
            round2(cutoff as f64 * before + (stops - cutoff) as f64 * after)
        };
        prop_assert_eq!(compute_total(stops, 0.0, &config), expected);
    }

    #[test]
    fn totals_are_monotone_in_stops(
        stops in 0u32..400,
        extra in 0.0f64..100.0,
    ) {
        let config = PaymentConfig::default();
        prop_assert!(
            compute_total(stops + 1, extra, &config)
                >= compute_total(stops, extra, &config)
        );
    }

    #[test]
    fn negative_extra_never_lowers_the_base(
        stops in 0u32..400,
        extra in -500.0f64..0.0,
    ) {
        let config = PaymentConfig::default();
        prop_assert_eq!(
            compute_total(stops, extra, &config),
            compute_total(stops, 0.0, &config)
        );
    }
}
