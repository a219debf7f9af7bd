//! File Header record (`1`)

use super::field::{
    alpha_field, check_routing_number, is_numeric, is_upper_alphanumeric, is_valid_hhmm,
    is_valid_yymmdd, require_alphanumeric, require_present, Slots,
};
use super::Record;
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First record of a file: routing of the whole file and its creation stamp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub priority_code: String,
    /// Routing number of the receiving point, 9 digits (10 when agency assigned)
    pub immediate_destination: String,
    /// Routing number or company identification of the sender
    pub immediate_origin: String,
    /// YYMMDD
    pub file_creation_date: String,
    /// HHMM, optional
    pub file_creation_time: String,
    /// Distinguishes files created on the same date (A-Z, 0-9)
    pub file_id_modifier: String,
    pub record_size: String,
    pub blocking_factor: String,
    pub format_code: String,
    pub immediate_destination_name: String,
    pub immediate_origin_name: String,
    pub reference_code: String,
}

impl FileHeader {
    /// A header with the constant fields pre-filled
    pub fn new() -> Self {
        FileHeader {
            priority_code: "01".to_string(),
            file_id_modifier: "A".to_string(),
            record_size: "094".to_string(),
            blocking_factor: "10".to_string(),
            format_code: "1".to_string(),
            ..FileHeader::default()
        }
    }

    /// Validate honoring origin/destination overrides
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<(), FieldError> {
        if opts.skip_all {
            return Ok(());
        }
        if self.priority_code != "01" {
            return Err(FieldError::new(
                "PriorityCode",
                &self.priority_code,
                FieldErrorKind::Constant { expected: "01".into() },
            ));
        }
        if !opts.bypass_destination_validation {
            require_present("ImmediateDestination", &self.immediate_destination)?;
            check_routing_field("ImmediateDestination", &self.immediate_destination)?;
        }
        if !opts.bypass_origin_validation {
            require_present("ImmediateOrigin", &self.immediate_origin)?;
            if opts.require_aba_origin {
                check_routing_field("ImmediateOrigin", &self.immediate_origin)?;
            } else {
                require_alphanumeric("ImmediateOrigin", &self.immediate_origin)?;
            }
        }
        if !is_valid_yymmdd(&self.file_creation_date) {
            return Err(FieldError::new(
                "FileCreationDate",
                &self.file_creation_date,
                FieldErrorKind::InvalidDate,
            ));
        }
        if !self.file_creation_time.is_empty() && !is_valid_hhmm(&self.file_creation_time) {
            return Err(FieldError::new(
                "FileCreationTime",
                &self.file_creation_time,
                FieldErrorKind::InvalidTime,
            ));
        }
        if self.file_id_modifier.chars().count() != 1
            || !is_upper_alphanumeric(&self.file_id_modifier)
        {
            return Err(FieldError::new(
                "FileIDModifier",
                &self.file_id_modifier,
                FieldErrorKind::FileIdModifier,
            ));
        }
        for (name, value, expected) in [
            ("RecordSize", &self.record_size, "094"),
            ("BlockingFactor", &self.blocking_factor, "10"),
            ("FormatCode", &self.format_code, "1"),
        ] {
            if value != expected {
                return Err(FieldError::new(
                    name,
                    value,
                    FieldErrorKind::Constant { expected: expected.into() },
                ));
            }
        }
        require_alphanumeric("ImmediateDestinationName", &self.immediate_destination_name)?;
        require_alphanumeric("ImmediateOriginName", &self.immediate_origin_name)?;
        require_alphanumeric("ReferenceCode", &self.reference_code)?;
        Ok(())
    }
}

/// A 9-digit routing number, or a 10-digit number which is only checked as numeric
fn check_routing_field(field_name: &str, value: &str) -> Result<(), FieldError> {
    match value.len() {
        9 => check_routing_number(field_name, value),
        10 if is_numeric(value) => Ok(()),
        _ => Err(FieldError::new(field_name, value, FieldErrorKind::NonNumeric)),
    }
}

/// Routing numbers occupy 10 characters with a leading blank
fn routing_slot(value: &str) -> String {
    if value.chars().count() == 9 {
        format!(" {}", value)
    } else {
        alpha_field(value, 10)
    }
}

/// Inverse of [`routing_slot`]
///
/// Drops the leading blank and trailing padding only when re-encoding gives
/// back the same slot, so non-standard slots keep their exact text.
fn parse_routing_slot(slot: &str) -> String {
    let value = slot.strip_prefix(' ').unwrap_or(slot);
    let trimmed = value.trim_end();
    if routing_slot(trimmed) == slot {
        trimmed.to_string()
    } else {
        value.to_string()
    }
}

impl Record for FileHeader {
    const NAME: &'static str = "FileHeader";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return FileHeader::default();
        };
        FileHeader {
            priority_code: s.alpha(1..3),
            immediate_destination: parse_routing_slot(&s.raw(3..13)),
            immediate_origin: parse_routing_slot(&s.raw(13..23)),
            file_creation_date: s.alpha(23..29),
            file_creation_time: s.alpha(29..33),
            file_id_modifier: s.alpha(33..34),
            record_size: s.alpha(34..37),
            blocking_factor: s.alpha(37..39),
            format_code: s.alpha(39..40),
            immediate_destination_name: s.alpha(40..63),
            immediate_origin_name: s.alpha(63..86),
            reference_code: s.alpha(86..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        self.validate_with(&ValidateOpts::default())
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1{}{}{}{}{}{}{}{}{}{}{}{}",
            alpha_field(&self.priority_code, 2),
            routing_slot(&self.immediate_destination),
            routing_slot(&self.immediate_origin),
            alpha_field(&self.file_creation_date, 6),
            alpha_field(&self.file_creation_time, 4),
            alpha_field(&self.file_id_modifier, 1),
            alpha_field(&self.record_size, 3),
            alpha_field(&self.blocking_factor, 2),
            alpha_field(&self.format_code, 1),
            alpha_field(&self.immediate_destination_name, 23),
            alpha_field(&self.immediate_origin_name, 23),
            alpha_field(&self.reference_code, 8),
        )
    }
}
