//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API reports prices as bare JSON numbers in the shop's single
//! currency (New Taiwan dollars). Some endpoints return them as numeric
//! strings, so deserialization accepts both.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the shop currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol prefixed when displaying prices.
    pub const SYMBOL: &'static str = "NT$";

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of dollars.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The raw decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display, e.g. `NT$1,280` or `NT$99.50`.
    ///
    /// Whole amounts are shown without decimals; fractional amounts are
    /// rounded half-away-from-zero to two places.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let text = rounded.abs().to_string();

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let grouped = group_thousands(whole);
        match fraction {
            Some(fraction) => format!("{sign}{}{grouped}.{fraction:0<2}", Self::SYMBOL),
            None => format!("{sign}{}{grouped}", Self::SYMBOL),
        }
    }
}

/// Insert `,` separators every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_display_whole_amount() {
        assert_eq!(Price::from_whole(0).display(), "NT$0");
        assert_eq!(Price::from_whole(999).display(), "NT$999");
        assert_eq!(Price::from_whole(1280).display(), "NT$1,280");
        assert_eq!(Price::from_whole(1_234_567).display(), "NT$1,234,567");
    }

    #[test]
    fn test_display_fractional_amount() {
        let price = Price::new(Decimal::from_str("99.5").unwrap());
        assert_eq!(price.display(), "NT$99.50");

        let price = Price::new(Decimal::from_str("1000.005").unwrap());
        assert_eq!(price.display(), "NT$1,000.01");
    }

    #[test]
    fn test_display_drops_trailing_zero_decimals() {
        let price = Price::new(Decimal::from_str("450.00").unwrap());
        assert_eq!(price.display(), "NT$450");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_int: Price = serde_json::from_str("1200").unwrap();
        assert_eq!(from_int, Price::from_whole(1200));

        let from_float: Price = serde_json::from_str("99.5").unwrap();
        assert_eq!(from_float.display(), "NT$99.50");

        let from_str: Price = serde_json::from_str("\"300\"").unwrap();
        assert_eq!(from_str, Price::from_whole(300));
    }
}
