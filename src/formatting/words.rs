//! English amount-in-words rendering for cheques and printed documents

use bigdecimal::BigDecimal;

use crate::formatting::{amount_from_f64, split_cents, FormatError};

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

// Short scale, lowest group first
const SCALES: [&str; 4] = ["", "Thousand", "Million", "Billion"];

/// Spell out an amount: `1234.50` becomes
/// `"One Thousand Two Hundred Thirty Four and 50/100"`.
///
/// The amount is rounded half-up to cents first. Zero renders as `"Zero"`.
pub fn number_to_words(amount: &BigDecimal) -> Result<String, FormatError> {
    let (negative, whole, cents) = split_cents(amount);
    if negative {
        return Err(FormatError::Negative(amount.to_string()));
    }
    if whole.len() > 12 {
        return Err(FormatError::OutOfRange(format!(
            "{} exceeds the billions",
            amount
        )));
    }
    let whole: u64 = whole
        .parse()
        .map_err(|_| FormatError::OutOfRange(amount.to_string()))?;

    let mut words = integer_to_words(whole);
    if cents > 0 {
        words.push_str(&format!(" and {:02}/100", cents));
    }
    Ok(words)
}

/// [`number_to_words`] for floating point input
pub fn number_to_words_f64(amount: f64) -> Result<String, FormatError> {
    number_to_words(&amount_from_f64(amount)?)
}

fn integer_to_words(mut n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let mut groups: Vec<String> = Vec::new();
    for scale in SCALES.iter() {
        let chunk = n % 1000;
        n /= 1000;
        if chunk == 0 {
            continue;
        }
        let mut words = chunk_to_words(chunk);
        if !scale.is_empty() {
            words.push(scale);
        }
        groups.push(words.join(" "));
    }
    groups.reverse();
    groups.join(" ")
}

fn chunk_to_words(chunk: u64) -> Vec<&'static str> {
    let mut words = Vec::new();
    let hundreds = (chunk / 100) as usize;
    let rest = (chunk % 100) as usize;

    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("Hundred");
    }
    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }
    words
}
