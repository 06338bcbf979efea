use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fee rate expressed in basis points so offer math stays in exact integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeeRate(u32);

impl FeeRate {
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// On the wire the rate is a decimal percentage (7.0 means 7.00%), matching
// what the marketing calculators render.
impl Serialize for FeeRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_percent())
    }
}

impl<'de> Deserialize<'de> for FeeRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let percent = f64::deserialize(deserializer)?;
        if !percent.is_finite() || percent < 0.0 {
            return Err(D::Error::custom("fee rate must be a non-negative percentage"));
        }
        Ok(Self((percent * 100.0).round() as u32))
    }
}

const FEE_TABLE: [(u8, FeeRate); 12] = [
    (1, FeeRate::from_basis_points(500)),
    (2, FeeRate::from_basis_points(600)),
    (3, FeeRate::from_basis_points(700)),
    (4, FeeRate::from_basis_points(800)),
    (5, FeeRate::from_basis_points(900)),
    (6, FeeRate::from_basis_points(1000)),
    (7, FeeRate::from_basis_points(1100)),
    (8, FeeRate::from_basis_points(1200)),
    (9, FeeRate::from_basis_points(1300)),
    (10, FeeRate::from_basis_points(1375)),
    (11, FeeRate::from_basis_points(1450)),
    (12, FeeRate::from_basis_points(1500)),
];

// NOTE: the fallback undercuts every rate from 9 months up (10.00% vs
// 13.00%+). Normal input clamping keeps terms inside the table, so the rate
// is only reachable if upstream validation is bypassed. Kept verbatim
// pending a product ruling; do not "fix" without one.
const FALLBACK_RATE: FeeRate = FeeRate::from_basis_points(1000);

/// Fixed duration-premium table mapping term length to its fee rate.
#[derive(Debug)]
pub struct FeeSchedule {
    entries: &'static [(u8, FeeRate)],
    fallback: FeeRate,
}

impl FeeSchedule {
    pub fn standard() -> Self {
        Self {
            entries: &FEE_TABLE,
            fallback: FALLBACK_RATE,
        }
    }

    /// Rate for a term, falling back for terms outside the table.
    pub fn rate_for(&self, term_months: u8) -> FeeRate {
        self.entries
            .iter()
            .find(|(months, _)| *months == term_months)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.fallback)
    }

    pub fn entries(&self) -> &[(u8, FeeRate)] {
        self.entries
    }

    pub fn fallback_rate(&self) -> FeeRate {
        self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_monotonically_non_decreasing() {
        let schedule = FeeSchedule::standard();
        for window in schedule.entries().windows(2) {
            let (shorter, longer) = (window[0], window[1]);
            assert!(
                longer.1 >= shorter.1,
                "rate for {} months ({}) fell below {} months ({})",
                longer.0,
                longer.1,
                shorter.0,
                shorter.1
            );
        }
    }

    #[test]
    fn table_covers_months_one_through_twelve() {
        let schedule = FeeSchedule::standard();
        let months: Vec<u8> = schedule.entries().iter().map(|(m, _)| *m).collect();
        assert_eq!(months, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn pinned_rates_match_published_calculator() {
        let schedule = FeeSchedule::standard();
        assert_eq!(schedule.rate_for(1).basis_points(), 500);
        assert_eq!(schedule.rate_for(3).basis_points(), 700);
        assert_eq!(schedule.rate_for(9).basis_points(), 1300);
        assert_eq!(schedule.rate_for(11).basis_points(), 1450);
        assert_eq!(schedule.rate_for(12).basis_points(), 1500);
    }

    #[test]
    fn out_of_table_terms_fall_back_below_long_term_rates() {
        // Documents the inconsistency rather than hiding it: a 13-month term
        // would price cheaper than a 12-month one.
        let schedule = FeeSchedule::standard();
        assert_eq!(schedule.rate_for(13), schedule.fallback_rate());
        assert!(schedule.rate_for(13) < schedule.rate_for(12));
        assert_eq!(schedule.rate_for(0), schedule.fallback_rate());
    }

    #[test]
    fn fee_rate_formats_as_percentage() {
        assert_eq!(FeeRate::from_basis_points(700).to_string(), "7.00%");
        assert_eq!(FeeRate::from_basis_points(1375).to_string(), "13.75%");
    }

    #[test]
    fn fee_rate_serializes_as_decimal_percent() {
        let json = serde_json::to_string(&FeeRate::from_basis_points(725)).expect("serializes");
        assert_eq!(json, "7.25");
        let parsed: FeeRate = serde_json::from_str("7.25").expect("deserializes");
        assert_eq!(parsed.basis_points(), 725);
    }
}
