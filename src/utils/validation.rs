//! Validation utilities

use crate::numbering::{NumberFormat, Segment};
use crate::traits::*;
use crate::types::*;

/// Validate that a document type key is valid
pub fn validate_document_type(key: &str) -> NumberingResult<()> {
    if key.trim().is_empty() {
        return Err(NumberingError::Validation(
            "Document type cannot be empty".to_string(),
        ));
    }

    if key.len() > 64 {
        return Err(NumberingError::Validation(
            "Document type cannot exceed 64 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(NumberingError::Validation(format!(
            "Document type '{}' can only contain alphanumeric characters, dashes, and underscores",
            key
        )));
    }

    Ok(())
}

/// Check that a format can tell reset epochs apart.
///
/// A yearly counter without a year placeholder, or a monthly counter without
/// year and month, would issue the same number twice.
pub fn validate_format_for_reset(format: &NumberFormat, reset_period: ResetPeriod) -> NumberingResult<()> {
    let has_year = format
        .segments()
        .iter()
        .any(|s| matches!(s, Segment::Year4 | Segment::Year2));
    let has_month = format.segments().contains(&Segment::Month);

    match reset_period {
        ResetPeriod::Never => Ok(()),
        ResetPeriod::Yearly if !has_year => Err(NumberingError::Validation(format!(
            "yearly counter format '{}' has no year placeholder",
            format
        ))),
        ResetPeriod::Monthly if !(has_year && has_month) => {
            Err(NumberingError::Validation(format!(
                "monthly counter format '{}' needs year and month placeholders",
                format
            )))
        }
        _ => Ok(()),
    }
}

/// Counter validator that also rejects formats which would repeat numbers
/// across reset epochs
pub struct EnhancedCounterValidator;

impl CounterValidator for EnhancedCounterValidator {
    fn validate_counter(&self, counter: &Counter) -> NumberingResult<()> {
        validate_document_type(&counter.key)?;
        let format = NumberFormat::parse(&counter.format)?;
        validate_format_for_reset(&format, counter.reset_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_keys() {
        assert!(validate_document_type("purchase-order").is_ok());
        assert!(validate_document_type("goods_receiving_voucher").is_ok());
        assert!(validate_document_type("").is_err());
        assert!(validate_document_type("purchase order").is_err());
        assert!(validate_document_type(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_format_for_reset() {
        let yearly = NumberFormat::parse("PO-{YY}-{###}").unwrap();
        assert!(validate_format_for_reset(&yearly, ResetPeriod::Yearly).is_ok());
        assert!(validate_format_for_reset(&yearly, ResetPeriod::Monthly).is_err());

        let plain = NumberFormat::parse("PO-{###}").unwrap();
        assert!(validate_format_for_reset(&plain, ResetPeriod::Never).is_ok());
        assert!(validate_format_for_reset(&plain, ResetPeriod::Yearly).is_err());
    }
}
