//! Currency and amount-in-words formatting

pub mod currency;
pub mod words;

pub use currency::*;
pub use words::*;

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::utils::money::round_money;

/// Formatting errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Amount is not a finite number: {0}")]
    NonFinite(f64),
    #[error("Amount cannot be negative: {0}")]
    Negative(String),
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

/// Convert a floating point amount, rejecting NaN and infinities
pub fn amount_from_f64(amount: f64) -> Result<BigDecimal, FormatError> {
    if !amount.is_finite() {
        return Err(FormatError::NonFinite(amount));
    }
    BigDecimal::from_str(&amount.to_string())
        .map_err(|e| FormatError::OutOfRange(format!("{}: {}", amount, e)))
}

/// Whole units and cents of an amount rounded to cents.
///
/// Returns the sign separately; both parts are magnitudes.
pub(crate) fn split_cents(amount: &BigDecimal) -> (bool, String, u32) {
    let rounded = round_money(amount);
    let negative = rounded < BigDecimal::zero();
    let (unscaled, _) = rounded.as_bigint_and_exponent();
    let digits = unscaled.magnitude().to_string();
    let digits = format!("{:0>3}", digits);
    let (whole, cents) = digits.split_at(digits.len() - 2);
    // two ASCII digits always parse
    let cents = cents.parse().unwrap_or(0);
    (negative, whole.to_string(), cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_from_f64() {
        assert_eq!(amount_from_f64(1234.5).unwrap(), BigDecimal::from_str("1234.5").unwrap());
        assert!(matches!(amount_from_f64(f64::NAN), Err(FormatError::NonFinite(_))));
        assert!(matches!(amount_from_f64(f64::INFINITY), Err(FormatError::NonFinite(_))));
        assert!(amount_from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_split_cents() {
        let (negative, whole, cents) = split_cents(&BigDecimal::from_str("1234.505").unwrap());
        assert!(!negative);
        assert_eq!(whole, "1234");
        assert_eq!(cents, 51);

        let (negative, whole, cents) = split_cents(&BigDecimal::from_str("-0.07").unwrap());
        assert!(negative);
        assert_eq!(whole, "0");
        assert_eq!(cents, 7);
    }
}
