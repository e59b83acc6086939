//! Money rounding helpers

use bigdecimal::{BigDecimal, RoundingMode};

/// Number of decimal places monetary amounts are kept at
pub const MONEY_SCALE: i64 = 2;

/// Round to cents, half away from zero
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

pub(crate) fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_half_up() {
        assert_eq!(
            round_money(&BigDecimal::from_str("2.345").unwrap()),
            BigDecimal::from_str("2.35").unwrap()
        );
        assert_eq!(
            round_money(&BigDecimal::from_str("2.344").unwrap()),
            BigDecimal::from_str("2.34").unwrap()
        );
        assert_eq!(round_money(&BigDecimal::from(7)).to_string(), "7.00");
    }
}
