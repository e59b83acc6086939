//! Document number format strings: rendering and parsing

use chrono::{Datelike, NaiveDateTime};
use std::fmt;

use crate::types::*;

/// One piece of a parsed format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim
    Literal(String),
    /// `{YYYY}`
    Year4,
    /// `{YY}`
    Year2,
    /// `{MM}`
    Month,
    /// `{##}`, `{###}`, `{####}`: the sequence padded to this many digits
    Sequence(usize),
}

impl Segment {
    fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "YYYY" => Some(Segment::Year4),
            "YY" => Some(Segment::Year2),
            "MM" => Some(Segment::Month),
            "##" => Some(Segment::Sequence(2)),
            "###" => Some(Segment::Sequence(3)),
            "####" => Some(Segment::Sequence(4)),
            _ => None,
        }
    }

    /// Fixed digit count, if the segment is numeric
    fn width(&self) -> Option<usize> {
        match self {
            Segment::Literal(_) => None,
            Segment::Year4 => Some(4),
            Segment::Year2 | Segment::Month => Some(2),
            Segment::Sequence(width) => Some(*width),
        }
    }
}

/// A validated format string such as `PO-{YYYY}-{####}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    source: String,
    segments: Vec<Segment>,
}

impl NumberFormat {
    /// Parse and validate a format string.
    ///
    /// Only `{YYYY}`, `{YY}`, `{MM}`, `{####}`, `{###}` and `{##}` are
    /// recognized, and at least one sequence placeholder is required. Two
    /// sequence placeholders must be separated by literal text.
    pub fn parse(source: &str) -> NumberingResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find(['{', '}']) {
            literal.push_str(&rest[..open]);
            if rest[open..].starts_with('}') {
                return Err(NumberingError::InvalidFormat(format!(
                    "unmatched '}}' in '{}'",
                    source
                )));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                NumberingError::InvalidFormat(format!("unclosed '{{' in '{}'", source))
            })?;
            let name = &after[..close];
            let segment = Segment::from_placeholder(name).ok_or_else(|| {
                NumberingError::InvalidFormat(format!(
                    "unknown placeholder '{{{}}}' in '{}'",
                    name, source
                ))
            })?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            if matches!(segment, Segment::Sequence(_))
                && matches!(segments.last(), Some(Segment::Sequence(_)))
            {
                return Err(NumberingError::InvalidFormat(format!(
                    "adjacent sequence placeholders in '{}'",
                    source
                )));
            }
            segments.push(segment);
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.iter().any(|s| matches!(s, Segment::Sequence(_))) {
            return Err(NumberingError::InvalidFormat(format!(
                "'{}' has no sequence placeholder",
                source
            )));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The format string as given
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render a document number for `sequence` issued at `at`
    pub fn render(&self, sequence: u64, at: NaiveDateTime) -> String {
        let mut out = String::with_capacity(self.source.len() + 4);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Year4 => out.push_str(&format!("{:04}", at.year())),
                Segment::Year2 => out.push_str(&format!("{:02}", at.year().rem_euclid(100))),
                Segment::Month => out.push_str(&format!("{:02}", at.month())),
                Segment::Sequence(width) => {
                    out.push_str(&format!("{:0>width$}", sequence, width = *width))
                }
            }
        }
        out
    }

    /// Recover year, month and sequence from a rendered number.
    ///
    /// A sequence placeholder followed by text consumes every digit up to
    /// that text, so values wider than the placeholder still parse. When it
    /// is directly followed by another placeholder it consumes exactly its
    /// width.
    pub fn parse_number(&self, number: &str) -> NumberingResult<ParsedNumber> {
        let parse_err = || {
            NumberingError::Parse(format!(
                "'{}' does not match format '{}'",
                number, self.source
            ))
        };

        let mut rest = number;
        let mut year4: Option<i32> = None;
        let mut year2: Option<i32> = None;
        let mut month: Option<u32> = None;
        let mut sequence: Option<u64> = None;

        for (index, segment) in self.segments.iter().enumerate() {
            if let Segment::Literal(text) = segment {
                rest = rest.strip_prefix(text.as_str()).ok_or_else(parse_err)?;
                continue;
            }

            let run = rest.bytes().take_while(u8::is_ascii_digit).count();
            let followed_by_placeholder = self
                .segments
                .get(index + 1)
                .is_some_and(|next| next.width().is_some());
            let take = match segment {
                Segment::Sequence(width) if !followed_by_placeholder => {
                    if run < *width {
                        return Err(parse_err());
                    }
                    run
                }
                _ => {
                    let width = segment.width().unwrap_or(0);
                    if run < width {
                        return Err(parse_err());
                    }
                    width
                }
            };
            let (digits, tail) = rest.split_at(take);
            rest = tail;

            match segment {
                Segment::Year4 => year4 = Some(digits.parse().map_err(|_| parse_err())?),
                Segment::Year2 => year2 = Some(digits.parse().map_err(|_| parse_err())?),
                Segment::Month => {
                    let value: u32 = digits.parse().map_err(|_| parse_err())?;
                    if !(1..=12).contains(&value) || month.is_some_and(|m| m != value) {
                        return Err(parse_err());
                    }
                    month = Some(value);
                }
                Segment::Sequence(_) => {
                    let value: u64 = digits.parse().map_err(|_| parse_err())?;
                    if sequence.is_some_and(|s| s != value) {
                        return Err(parse_err());
                    }
                    sequence = Some(value);
                }
                Segment::Literal(_) => {}
            }
        }

        if !rest.is_empty() {
            return Err(parse_err());
        }

        let year = match (year4, year2) {
            (Some(full), Some(short)) if full.rem_euclid(100) != short => {
                return Err(parse_err());
            }
            (Some(full), _) => Some(full),
            (None, Some(short)) => Some(2000 + short),
            (None, None) => None,
        };

        Ok(ParsedNumber {
            year,
            month,
            sequence: sequence.ok_or_else(parse_err)?,
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_render_all_placeholders() {
        let format = NumberFormat::parse("GRV-{YY}{MM}-{###}").unwrap();
        assert_eq!(format.render(7, at(2024, 3, 9)), "GRV-2403-007");

        let format = NumberFormat::parse("PO-{YYYY}-{####}").unwrap();
        assert_eq!(format.render(42, at(2025, 12, 1)), "PO-2025-0042");
    }

    #[test]
    fn test_render_does_not_truncate_wide_values() {
        let format = NumberFormat::parse("V-{##}").unwrap();
        assert_eq!(format.render(123, at(2024, 1, 1)), "V-123");
    }

    #[test]
    fn test_mixed_sequence_widths_share_one_value() {
        let format = NumberFormat::parse("{##}/{####}").unwrap();
        assert_eq!(format.render(5, at(2024, 1, 1)), "05/0005");
        let parsed = format.parse_number("05/0005").unwrap();
        assert_eq!(parsed.sequence, 5);
        assert!(format.parse_number("05/0006").is_err());
    }

    #[test]
    fn test_rejects_bad_formats() {
        assert!(matches!(
            NumberFormat::parse("PO-{YYYY}"),
            Err(NumberingError::InvalidFormat(_))
        ));
        assert!(NumberFormat::parse("PO-{DD}-{###}").is_err());
        assert!(NumberFormat::parse("PO-{###").is_err());
        assert!(NumberFormat::parse("PO-}{###}").is_err());
        assert!(NumberFormat::parse("PO-{#####}").is_err());
    }

    #[test]
    fn test_rejects_adjacent_sequence_placeholders() {
        assert!(matches!(
            NumberFormat::parse("X-{##}{####}"),
            Err(NumberingError::InvalidFormat(_))
        ));
        assert!(NumberFormat::parse("{###}{###}").is_err());

        let format = NumberFormat::parse("X-{##}-{####}").unwrap();
        let rendered = format.render(123, at(2024, 1, 1));
        assert_eq!(rendered, "X-123-0123");
        assert_eq!(format.parse_number(&rendered).unwrap().sequence, 123);
    }

    #[test]
    fn test_parse_round_trip() {
        let format = NumberFormat::parse("GRV-{YY}{MM}-{###}").unwrap();
        let rendered = format.render(12, at(2024, 11, 3));
        let parsed = format.parse_number(&rendered).unwrap();
        assert_eq!(
            parsed,
            ParsedNumber {
                year: Some(2024),
                month: Some(11),
                sequence: 12
            }
        );
    }

    #[test]
    fn test_parse_wide_sequence() {
        let format = NumberFormat::parse("PO-{YYYY}-{####}").unwrap();
        let parsed = format.parse_number("PO-2024-12345").unwrap();
        assert_eq!(parsed.sequence, 12345);
        assert_eq!(parsed.year, Some(2024));
    }

    #[test]
    fn test_parse_rejects_mismatch() {
        let format = NumberFormat::parse("PO-{YYYY}-{####}").unwrap();
        assert!(format.parse_number("PR-2024-0001").is_err());
        assert!(format.parse_number("PO-2024-01").is_err());
        assert!(format.parse_number("PO-2024-0001x").is_err());

        let format = NumberFormat::parse("{YY}{MM}{###}").unwrap();
        assert!(format.parse_number("2413001").is_err());
    }
}
