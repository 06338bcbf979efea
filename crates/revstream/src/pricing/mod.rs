//! Pricing for revenue advances.
//!
//! Two independent models coexist: the fee-schedule advance quoted to
//! subscription creators, and the flat-commission quote shown to property
//! managers. They are deliberately separate pure functions sharing no state.

mod schedule;

pub use schedule::{FeeRate, FeeSchedule};

use serde::{Deserialize, Serialize};

/// Slider step for the repayment selector, in whole currency units.
pub const REPAYMENT_STEP: u64 = 10_000;

/// Term bounds enforced by the advance calculator.
pub const MIN_TERM_MONTHS: u8 = 1;
pub const MAX_TERM_MONTHS: u8 = 9;

/// Commission rate applied to property-manager rent rolls.
pub const COMMISSION_RATE: FeeRate = FeeRate::from_basis_points(200);

/// A quoted advance. Derived on every input change and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvanceOffer {
    pub total_repayment: u64,
    pub term_months: u8,
    pub fee_rate: FeeRate,
    pub fee: u64,
    pub advance_amount: u64,
}

/// Flat-commission quote for the property-manager calculator variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionQuote {
    pub monthly_rent: u64,
    pub term_months: u8,
    pub commission_rate: FeeRate,
    pub commission: u64,
}

fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

/// Quote an advance for a chosen total repayment.
///
/// Deterministic and total over `u64`: the term is the repayment divided by
/// the slider step, rounded then clamped to [1, 9], and the advance is
/// reconstructed by subtraction so `advance_amount + fee == total_repayment`
/// holds exactly.
pub fn advance_offer(total_repayment: u64) -> AdvanceOffer {
    let term_months = round_half_up(total_repayment, REPAYMENT_STEP)
        .clamp(u64::from(MIN_TERM_MONTHS), u64::from(MAX_TERM_MONTHS)) as u8;

    let fee_rate = FeeSchedule::standard().rate_for(term_months);
    let fee = round_half_up(total_repayment * u64::from(fee_rate.basis_points()), 10_000);

    AdvanceOffer {
        total_repayment,
        term_months,
        fee_rate,
        fee,
        advance_amount: total_repayment - fee,
    }
}

/// Quote the flat 2% commission collected on a managed rent roll.
pub fn property_manager_commission(monthly_rent: u64, term_months: u8) -> CommissionQuote {
    let collected = monthly_rent * u64::from(term_months);
    let commission = round_half_up(collected * u64::from(COMMISSION_RATE.basis_points()), 10_000);

    CommissionQuote {
        monthly_rent,
        term_months,
        commission_rate: COMMISSION_RATE,
        commission,
    }
}
