//! Currency formatting

use bigdecimal::BigDecimal;

use crate::formatting::{amount_from_f64, split_cents, FormatError};

/// Render `amount` as `"{CODE} 1,234.50"`.
///
/// The amount is rounded half-up to cents. Negative amounts render as
/// `"{CODE} -1,234.50"`.
pub fn format_currency(amount: &BigDecimal, currency_code: &str) -> String {
    let (negative, whole, cents) = split_cents(amount);
    let sign = if negative { "-" } else { "" };
    format!(
        "{} {}{}.{:02}",
        currency_code,
        sign,
        group_thousands(&whole),
        cents
    )
}

/// [`format_currency`] for floating point input
pub fn format_currency_f64(amount: f64, currency_code: &str) -> Result<String, FormatError> {
    Ok(format_currency(&amount_from_f64(amount)?, currency_code))
}

/// Insert a comma between every group of three digits
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(&dec("1234.5"), "KES"), "KES 1,234.50");
        assert_eq!(format_currency(&dec("0"), "USD"), "USD 0.00");
        assert_eq!(format_currency(&dec("999.999"), "USD"), "USD 1,000.00");
        assert_eq!(format_currency(&dec("1234567.891"), "EUR"), "EUR 1,234,567.89");
        assert_eq!(format_currency(&dec("-1234.5"), "KES"), "KES -1,234.50");
        assert_eq!(format_currency(&dec("100"), "KES"), "KES 100.00");
    }

    #[test]
    fn test_format_currency_f64() {
        assert_eq!(format_currency_f64(1234.5, "KES").unwrap(), "KES 1,234.50");
        assert!(format_currency_f64(f64::NAN, "KES").is_err());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
