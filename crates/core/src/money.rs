//! Money value object.
//!
//! Amounts are whole minor units (e.g. cents) in a single implicit currency.
//! All arithmetic is checked integer arithmetic so long carts never drift.

use serde::{Deserialize, Serialize};

/// Non-negative amount in minor currency units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(units: u64) -> Self {
        Self(units)
    }

    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// `self × quantity`, or `None` on overflow.
    pub fn checked_mul(self, quantity: u64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert_eq!(Money::from_minor(u64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_minor(u64::MAX).checked_add(Money::from_minor(1)), None);
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Money::from_minor(4500)).unwrap(), "4500");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: checked multiplication agrees with u128 arithmetic when it fits.
            #[test]
            fn checked_mul_matches_wide_arithmetic(price in 0u64..1_000_000_000, qty in 0u64..1_000_000) {
                let wide = price as u128 * qty as u128;
                let got = Money::from_minor(price).checked_mul(qty).map(|m| m.minor_units() as u128);
                prop_assert_eq!(got, Some(wide));
            }
        }
    }
}
