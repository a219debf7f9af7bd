//! Fixed-width field codec
//!
//! Every record is a 94-character line made of fixed slots. Numeric slots are
//! right-justified and zero-padded, alphanumeric slots are left-justified and
//! space-padded. Decoding never fails: a non-numeric numeric slot decodes to
//! zero and the later `validate` call reports the zero-valued field.

use crate::types::{FieldError, FieldErrorKind};
use std::ops::Range;

/// Width of every NACHA record
pub const RECORD_LENGTH: usize = 94;

/// Character-indexed view of one record line
///
/// Slots are addressed with 0-based half-open ranges, so the 1-based
/// positions 4-11 of the layout become `3..11`.
#[derive(Debug, Clone)]
pub struct Slots {
    chars: Vec<char>,
}

impl Slots {
    /// Returns `None` unless the line is exactly [`RECORD_LENGTH`] characters
    pub fn new(line: &str) -> Option<Self> {
        let chars: Vec<char> = line.chars().collect();
        (chars.len() == RECORD_LENGTH).then_some(Slots { chars })
    }

    /// The slot exactly as written
    pub fn raw(&self, range: Range<usize>) -> String {
        self.chars[range].iter().collect()
    }

    /// Alphanumeric slot with trailing blank fill removed
    pub fn alpha(&self, range: Range<usize>) -> String {
        self.raw(range).trim_end().to_string()
    }

    /// Numeric slot; empty or non-numeric content decodes to zero
    pub fn number(&self, range: Range<usize>) -> u64 {
        parse_num(&self.raw(range))
    }

    pub fn number_u32(&self, range: Range<usize>) -> u32 {
        u32::try_from(self.number(range)).unwrap_or(0)
    }

    pub fn number_u16(&self, range: Range<usize>) -> u16 {
        u16::try_from(self.number(range)).unwrap_or(0)
    }

    pub fn number_u8(&self, range: Range<usize>) -> u8 {
        u8::try_from(self.number(range)).unwrap_or(0)
    }
}

/// Decode a numeric slot, treating empty or malformed input as zero
pub fn parse_num(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

/// Right-justify and zero-pad `value` to `width` digits
///
/// Values wider than the slot keep their low-order digits.
pub fn numeric_field(value: u64, width: usize) -> String {
    let digits = value.to_string();
    if digits.len() > width {
        digits[digits.len() - width..].to_string()
    } else {
        format!("{:0>width$}", digits, width = width)
    }
}

/// Left-justify and space-pad `value` to `width` characters, truncating if longer
pub fn alpha_field(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Right-justify and zero-pad a digit string (routing numbers, trace numbers)
pub fn string_field(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.chars().take(width).collect()
    } else {
        let mut out = "0".repeat(width - len);
        out.push_str(value);
        out
    }
}

/// Zero-pad `value` to `width` chars and split it after `at` chars
pub fn split_field(value: &str, width: usize, at: usize) -> (String, String) {
    let padded = string_field(value, width);
    let mut chars = padded.chars();
    let head = chars.by_ref().take(at).collect();
    (head, chars.collect())
}

pub fn is_numeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

/// NACHA alphanumeric: printable ASCII only
pub fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| (' '..='~').contains(&c))
}

pub fn is_upper_alphanumeric(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// ABA mod-10 check digit for an 8-digit routing prefix
///
/// Weights 3, 7, 1 repeat across the digits. Returns `None` when the input is
/// not exactly eight ASCII digits.
pub fn calculate_check_digit(routing: &str) -> Option<u8> {
    if routing.len() != 8 || !is_numeric(routing) {
        return None;
    }
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = routing
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    Some(((10 - sum % 10) % 10) as u8)
}

/// Validate a full 9-digit routing number including its check digit
pub fn check_routing_number(field_name: &str, routing: &str) -> Result<(), FieldError> {
    if routing.len() != 9 || !is_numeric(routing) {
        return Err(FieldError::new(field_name, routing, FieldErrorKind::NonNumeric));
    }
    let calculated = calculate_check_digit(&routing[..8])
        .ok_or_else(|| FieldError::new(field_name, routing, FieldErrorKind::NonNumeric))?;
    if u32::from(calculated) != u32::from(routing.as_bytes()[8] - b'0') {
        return Err(FieldError::new(
            field_name,
            routing,
            FieldErrorKind::ValidCheckDigit { calculated },
        ));
    }
    Ok(())
}

/// YYMMDD with a plausible month and day
pub fn is_valid_yymmdd(s: &str) -> bool {
    s.len() == 6 && is_numeric(s) && is_valid_month_day(&s[2..4], &s[4..6])
}

/// MMDD
pub fn is_valid_mmdd(s: &str) -> bool {
    s.len() == 4 && is_numeric(s) && is_valid_month_day(&s[0..2], &s[2..4])
}

/// MMYY card expiration
pub fn is_valid_mmyy(s: &str) -> bool {
    s.len() == 4 && is_numeric(s) && (1..=12).contains(&parse_num(&s[0..2]))
}

/// HHMM on a 24 hour clock
pub fn is_valid_hhmm(s: &str) -> bool {
    s.len() == 4 && is_numeric(s) && parse_num(&s[0..2]) < 24 && parse_num(&s[2..4]) < 60
}

fn is_valid_month_day(month: &str, day: &str) -> bool {
    let month = parse_num(month);
    let day = parse_num(day);
    let max_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => return false,
    };
    (1..=max_day).contains(&day)
}

/// Mandatory field must not be blank
pub(crate) fn require_present(field_name: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field_name, value, FieldErrorKind::FieldInclusion));
    }
    Ok(())
}

pub(crate) fn require_alphanumeric(field_name: &str, value: &str) -> Result<(), FieldError> {
    if !is_alphanumeric(value) {
        return Err(FieldError::new(field_name, value, FieldErrorKind::NonAlphanumeric));
    }
    Ok(())
}

pub(crate) fn require_numeric(field_name: &str, value: &str) -> Result<(), FieldError> {
    if !is_numeric(value) {
        return Err(FieldError::new(field_name, value, FieldErrorKind::NonNumeric));
    }
    Ok(())
}

/// Present and printable
pub(crate) fn require_text(field_name: &str, value: &str) -> Result<(), FieldError> {
    require_present(field_name, value)?;
    require_alphanumeric(field_name, value)
}

/// Numeric slot holding a non-zero value
pub(crate) fn require_nonzero(field_name: &str, value: u64) -> Result<(), FieldError> {
    if value == 0 {
        return Err(FieldError::new(field_name, value, FieldErrorKind::FieldInclusion));
    }
    Ok(())
}

/// Value must fit in `width` digits to serialize losslessly
pub(crate) fn require_width(field_name: &str, value: u64, width: usize) -> Result<(), FieldError> {
    if value.to_string().len() > width {
        return Err(FieldError::new(field_name, value, FieldErrorKind::Overflow { width }));
    }
    Ok(())
}

/// 8-digit routing prefix plus its separately stored check digit
pub(crate) fn check_rdfi(identification: &str, check_digit: &str) -> Result<(), FieldError> {
    require_present("RDFIIdentification", identification)?;
    require_numeric("RDFIIdentification", identification)?;
    if identification.len() != 8 {
        return Err(FieldError::new(
            "RDFIIdentification",
            identification,
            FieldErrorKind::FieldInclusion,
        ));
    }
    let calculated = calculate_check_digit(identification).ok_or_else(|| {
        FieldError::new("RDFIIdentification", identification, FieldErrorKind::NonNumeric)
    })?;
    if check_digit != calculated.to_string() {
        return Err(FieldError::new(
            "CheckDigit",
            check_digit,
            FieldErrorKind::ValidCheckDigit { calculated },
        ));
    }
    Ok(())
}

/// Substring of a fixed-width slot, padded first so short values slice safely
pub(crate) fn sub_slot(value: &str, width: usize, range: Range<usize>) -> String {
    let padded: Vec<char> = alpha_field(value, width).chars().collect();
    padded[range].iter().collect::<String>().trim_end().to_string()
}
