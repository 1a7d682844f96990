//! Purchase quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The requested quantity is below one.
    #[error("quantity must be at least 1 (got {0})")]
    BelowMinimum(i64),
    /// The requested quantity does not fit the supported range.
    #[error("quantity must be at most {max} (got {got})")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
        /// The rejected value.
        got: i64,
    },
}

/// A quantity of one product, always at least 1.
///
/// ## Examples
///
/// ```
/// use corner_shop_core::Quantity;
///
/// let qty = Quantity::ONE;
/// assert_eq!(qty.adjust(3).get(), 3);
/// // Values below one are ignored and the current quantity is kept
/// assert_eq!(qty.adjust(0).get(), 1);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Upper bound accepted from user input.
    pub const MAX: u32 = 999;

    /// Create a quantity, rejecting values outside `1..=MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] if `value` is below 1 or above [`Self::MAX`].
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::BelowMinimum(value));
        }
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(QuantityError::TooLarge {
                max: Self::MAX,
                got: value,
            })
    }

    /// Return the requested quantity if it is valid, otherwise keep `self`.
    #[must_use]
    pub fn adjust(self, requested: i64) -> Self {
        Self::new(requested).unwrap_or(self)
    }

    /// One more than the current quantity, saturating at [`Self::MAX`].
    #[must_use]
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX))
    }

    /// One less than the current quantity, never below 1.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }

    /// Whether the quantity can still be decremented.
    #[must_use]
    pub const fn can_decrement(self) -> bool {
        self.0 > 1
    }

    /// The underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::BelowMinimum(0)));
        assert_eq!(Quantity::new(-4), Err(QuantityError::BelowMinimum(-4)));
    }

    #[test]
    fn test_new_rejects_too_large() {
        assert!(matches!(
            Quantity::new(1000),
            Err(QuantityError::TooLarge { max: 999, got: 1000 })
        ));
        assert!(Quantity::new(i64::MAX).is_err());
    }

    #[test]
    fn test_adjust_keeps_current_on_invalid() {
        let qty = Quantity::new(4).unwrap();
        assert_eq!(qty.adjust(0), qty);
        assert_eq!(qty.adjust(-1), qty);
        assert_eq!(qty.adjust(7).get(), 7);
    }

    #[test]
    fn test_increment_and_decrement_bounds() {
        assert_eq!(Quantity::ONE.decrement(), Quantity::ONE);
        assert!(!Quantity::ONE.can_decrement());
        assert_eq!(Quantity::ONE.increment().get(), 2);
        assert!(Quantity::ONE.increment().can_decrement());

        let max = Quantity::new(i64::from(Quantity::MAX)).unwrap();
        assert_eq!(max.increment(), max);
    }

    #[test]
    fn test_serde() {
        let qty: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(qty.get(), 3);
        assert_eq!(serde_json::to_string(&qty).unwrap(), "3");
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}
