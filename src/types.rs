//! Core types and data structures for document numbering

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a counter's sequence starts over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResetPeriod {
    /// The sequence runs forever
    #[default]
    Never,
    /// The sequence restarts when the calendar year changes
    Yearly,
    /// The sequence restarts when the calendar month changes
    Monthly,
}

impl ResetPeriod {
    /// Whether a counter last reset at `last_reset` is due for a reset at `now`
    pub fn is_due(&self, last_reset: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            ResetPeriod::Never => false,
            ResetPeriod::Yearly => now.year() > last_reset.year(),
            ResetPeriod::Monthly => {
                (now.year(), now.month()) > (last_reset.year(), last_reset.month())
            }
        }
    }
}

impl fmt::Display for ResetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetPeriod::Never => "never",
            ResetPeriod::Yearly => "yearly",
            ResetPeriod::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Defaults used when a counter is created lazily for a document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTemplate {
    /// Document type the counter belongs to
    pub key: String,
    /// Format string with placeholders
    pub format: String,
    /// Reset cadence
    pub reset_period: ResetPeriod,
}

impl CounterTemplate {
    pub fn new(key: impl Into<String>, format: impl Into<String>, reset_period: ResetPeriod) -> Self {
        Self {
            key: key.into(),
            format: format.into(),
            reset_period,
        }
    }

    /// Build a fresh counter from this template
    pub fn instantiate(&self, now: NaiveDateTime) -> Counter {
        Counter {
            key: self.key.clone(),
            current: 0,
            format: self.format.clone(),
            reset_period: self.reset_period,
            last_reset: Some(now),
            updated_at: now,
        }
    }
}

/// A named running counter for one document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    /// Document type identifier
    pub key: String,
    /// Last issued sequence value, zero when nothing was issued in this epoch
    pub current: u64,
    /// Format string with placeholders
    pub format: String,
    /// Reset cadence
    pub reset_period: ResetPeriod,
    /// When the current epoch started
    pub last_reset: Option<NaiveDateTime>,
    /// When the counter was last touched
    pub updated_at: NaiveDateTime,
}

impl Counter {
    /// Apply the reset policy as of `now`.
    ///
    /// Returns `true` when the sequence was zeroed. A counter that was never
    /// stamped only gets its `last_reset` set.
    pub fn apply_reset(&mut self, now: NaiveDateTime) -> bool {
        match self.last_reset {
            None => {
                self.last_reset = Some(now);
                false
            }
            Some(last) if self.reset_period.is_due(last, now) => {
                self.current = 0;
                self.last_reset = Some(now);
                true
            }
            Some(_) => false,
        }
    }

    /// Apply the reset policy and take the next sequence value
    pub fn advance(&mut self, now: NaiveDateTime) -> u64 {
        self.apply_reset(now);
        self.current += 1;
        self.updated_at = now;
        self.current
    }

    /// The value `advance` would return at `now`, without mutating anything
    pub fn next_value(&self, now: NaiveDateTime) -> u64 {
        let due = self
            .last_reset
            .is_some_and(|last| self.reset_period.is_due(last, now));
        if due {
            1
        } else {
            self.current + 1
        }
    }

    /// Zero the counter unconditionally
    pub fn reset(&mut self, now: NaiveDateTime) {
        self.current = 0;
        self.last_reset = Some(now);
        self.updated_at = now;
    }
}

/// Components recovered from a rendered document number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedNumber {
    /// Calendar year, from `{YYYY}` or `{YY}`
    pub year: Option<i32>,
    /// Calendar month, from `{MM}`
    pub month: Option<u32>,
    /// Sequence value
    pub sequence: u64,
}

/// Errors that can occur while numbering documents
#[derive(Debug, thiserror::Error)]
pub enum NumberingError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),
    #[error("Invalid number format: {0}")]
    InvalidFormat(String),
    #[error("Counter not found: {0}")]
    CounterNotFound(String),
    #[error("Cannot parse document number: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for numbering operations
pub type NumberingResult<T> = Result<T, NumberingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_reset_period_due() {
        let last = at(2024, 6, 15);
        assert!(!ResetPeriod::Never.is_due(last, at(2030, 1, 1)));
        assert!(!ResetPeriod::Yearly.is_due(last, at(2024, 12, 31)));
        assert!(ResetPeriod::Yearly.is_due(last, at(2025, 1, 1)));
        assert!(!ResetPeriod::Monthly.is_due(last, at(2024, 6, 30)));
        assert!(ResetPeriod::Monthly.is_due(last, at(2024, 7, 1)));
        assert!(ResetPeriod::Monthly.is_due(last, at(2025, 1, 1)));
    }

    #[test]
    fn test_counter_advance_and_reset() {
        let template = CounterTemplate::new("purchase-order", "PO-{####}", ResetPeriod::Yearly);
        let mut counter = template.instantiate(at(2024, 3, 1));

        assert_eq!(counter.advance(at(2024, 3, 1)), 1);
        assert_eq!(counter.advance(at(2024, 11, 2)), 2);
        assert_eq!(counter.next_value(at(2025, 1, 2)), 1);
        assert_eq!(counter.advance(at(2025, 1, 2)), 1);
        assert_eq!(counter.last_reset, Some(at(2025, 1, 2)));
    }

    #[test]
    fn test_unstamped_counter_is_not_zeroed() {
        let mut counter = CounterTemplate::new("vendor", "V-{##}", ResetPeriod::Yearly)
            .instantiate(at(2024, 1, 1));
        counter.current = 7;
        counter.last_reset = None;

        assert!(!counter.apply_reset(at(2026, 1, 1)));
        assert_eq!(counter.current, 7);
        assert_eq!(counter.last_reset, Some(at(2026, 1, 1)));
    }

    #[test]
    fn test_counter_serializes_camel_case() {
        let counter = CounterTemplate::new("vendor", "V-{##}", ResetPeriod::Never)
            .instantiate(at(2024, 1, 1));
        let json = serde_json::to_value(&counter).unwrap();
        assert_eq!(json["resetPeriod"], "never");
        assert!(json.get("lastReset").is_some());
    }
}
