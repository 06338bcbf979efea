//! Property coverage for the pricing engine: the arithmetic identities the
//! marketing calculators rely on must hold for every input, not just the
//! slider's published stops.

use proptest::prelude::*;

use revstream::pricing::{
    advance_offer, property_manager_commission, FeeSchedule, MAX_TERM_MONTHS, MIN_TERM_MONTHS,
    REPAYMENT_STEP,
};

proptest! {
    #[test]
    fn advance_plus_fee_reconstructs_the_total(total in 0u64..2_000_000) {
        let offer = advance_offer(total);
        prop_assert_eq!(offer.advance_amount + offer.fee, total);
    }

    #[test]
    fn term_is_always_clamped(total in 0u64..2_000_000) {
        let offer = advance_offer(total);
        prop_assert!((MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&offer.term_months));
    }

    #[test]
    fn slider_stops_map_to_their_term(step in 1u64..=9) {
        let offer = advance_offer(step * REPAYMENT_STEP);
        prop_assert_eq!(u64::from(offer.term_months), step);
    }

    #[test]
    fn quoting_is_deterministic(total in 0u64..2_000_000) {
        prop_assert_eq!(advance_offer(total), advance_offer(total));
    }

    #[test]
    fn fee_never_exceeds_the_longest_term_rate(total in 0u64..2_000_000) {
        let offer = advance_offer(total);
        // 15.00% is the top of the table; rounding adds at most one unit.
        prop_assert!(offer.fee <= total * 1_500 / 10_000 + 1);
    }

    #[test]
    fn commission_is_two_percent_of_collected_rent(
        rent in 0u64..100_000,
        months in 1u8..=12,
    ) {
        let quote = property_manager_commission(rent, months);
        let collected = rent * u64::from(months);
        // commission * 50 reconstructs the collected rent up to rounding.
        prop_assert!((quote.commission * 50).abs_diff(collected) <= 25);
    }
}

#[test]
fn fee_schedule_is_monotonically_non_decreasing() {
    let schedule = FeeSchedule::standard();
    let mut previous = None;
    for months in 1..=12 {
        let rate = schedule.rate_for(months);
        if let Some(previous) = previous {
            assert!(rate >= previous, "rate dipped at {months} months");
        }
        previous = Some(rate);
    }
}
