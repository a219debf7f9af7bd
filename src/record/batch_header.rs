//! Batch Header record (`5`)

use super::field::{
    alpha_field, is_numeric, is_valid_yymmdd, numeric_field, require_alphanumeric,
    require_nonzero, require_numeric, require_present, require_text, string_field, Slots,
};
use super::Record;
use crate::types::codes::is_valid_service_class;
use crate::types::{FieldError, FieldErrorKind, SecCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opens a batch: originator, SEC code and settlement details shared by every entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    /// 200 mixed, 220 credits, 225 debits, 280 ADV
    pub service_class_code: u16,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    /// Selects the rule set applied to the batch
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub company_descriptive_date: String,
    /// YYMMDD
    pub effective_entry_date: String,
    /// Julian day inserted by the ACH operator; blank on origination
    pub settlement_date: String,
    pub originator_status_code: u8,
    /// First 8 digits of the originating bank routing number
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl BatchHeader {
    pub fn new(service_class_code: u16, sec: SecCode) -> Self {
        BatchHeader {
            service_class_code,
            standard_entry_class_code: sec.to_string(),
            originator_status_code: 1,
            batch_number: 1,
            ..BatchHeader::default()
        }
    }

    pub fn sec_code(&self) -> Option<SecCode> {
        self.standard_entry_class_code.parse().ok()
    }
}

impl Record for BatchHeader {
    const NAME: &'static str = "BatchHeader";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return BatchHeader::default();
        };
        BatchHeader {
            service_class_code: s.number_u16(1..4),
            company_name: s.alpha(4..20),
            company_discretionary_data: s.alpha(20..40),
            company_identification: s.alpha(40..50),
            standard_entry_class_code: s.alpha(50..53),
            company_entry_description: s.alpha(53..63),
            company_descriptive_date: s.alpha(63..69),
            effective_entry_date: s.alpha(69..75),
            settlement_date: s.alpha(75..78),
            originator_status_code: s.number_u8(78..79),
            odfi_identification: s.alpha(79..87),
            batch_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !is_valid_service_class(self.service_class_code) {
            return Err(FieldError::new(
                "ServiceClassCode",
                self.service_class_code,
                FieldErrorKind::ServiceClass,
            ));
        }
        if self.sec_code().is_none() {
            return Err(FieldError::new(
                "StandardEntryClassCode",
                &self.standard_entry_class_code,
                FieldErrorKind::SecCode,
            ));
        }
        require_text("CompanyName", &self.company_name)?;
        require_alphanumeric("CompanyDiscretionaryData", &self.company_discretionary_data)?;
        require_text("CompanyIdentification", &self.company_identification)?;
        require_text("CompanyEntryDescription", &self.company_entry_description)?;
        require_alphanumeric("CompanyDescriptiveDate", &self.company_descriptive_date)?;
        if !self.effective_entry_date.is_empty() && !is_valid_yymmdd(&self.effective_entry_date)
        {
            return Err(FieldError::new(
                "EffectiveEntryDate",
                &self.effective_entry_date,
                FieldErrorKind::InvalidDate,
            ));
        }
        if !self.settlement_date.is_empty() && !is_numeric(&self.settlement_date) {
            return Err(FieldError::new(
                "SettlementDate",
                &self.settlement_date,
                FieldErrorKind::NonNumeric,
            ));
        }
        if self.originator_status_code > 2 {
            return Err(FieldError::new(
                "OriginatorStatusCode",
                self.originator_status_code,
                FieldErrorKind::OriginatorStatusCode,
            ));
        }
        require_present("ODFIIdentification", &self.odfi_identification)?;
        require_numeric("ODFIIdentification", &self.odfi_identification)?;
        require_nonzero("BatchNumber", u64::from(self.batch_number))
    }
}

impl fmt::Display for BatchHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "5{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(u64::from(self.service_class_code), 3),
            alpha_field(&self.company_name, 16),
            alpha_field(&self.company_discretionary_data, 20),
            alpha_field(&self.company_identification, 10),
            alpha_field(&self.standard_entry_class_code, 3),
            alpha_field(&self.company_entry_description, 10),
            alpha_field(&self.company_descriptive_date, 6),
            alpha_field(&self.effective_entry_date, 6),
            alpha_field(&self.settlement_date, 3),
            numeric_field(u64::from(self.originator_status_code), 1),
            string_field(&self.odfi_identification, 8),
            numeric_field(u64::from(self.batch_number), 7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "5220Name on Account                     231380104 PPDVacation        230701   1121042880000001";

    #[test]
    fn test_parse_and_round_trip() {
        assert_eq!(LINE.len(), 94);
        let header = BatchHeader::parse(LINE);
        assert_eq!(header.service_class_code, 220);
        assert_eq!(header.company_name, "Name on Account");
        assert_eq!(header.company_identification, "231380104");
        assert_eq!(header.sec_code(), Some(SecCode::Ppd));
        assert_eq!(header.company_entry_description, "Vacation");
        assert_eq!(header.effective_entry_date, "230701");
        assert_eq!(header.originator_status_code, 1);
        assert_eq!(header.odfi_identification, "12104288");
        assert_eq!(header.batch_number, 1);
        assert!(header.validate().is_ok());
        assert_eq!(header.to_string(), LINE);
    }

    #[test]
    fn test_unknown_sec_code() {
        let mut header = BatchHeader::parse(LINE);
        header.standard_entry_class_code = "ABC".into();
        let err = header.validate().unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::SecCode);
    }

    #[test]
    fn test_invalid_service_class() {
        let mut header = BatchHeader::parse(LINE);
        header.service_class_code = 201;
        assert_eq!(header.validate().unwrap_err().kind, FieldErrorKind::ServiceClass);
    }

    #[test]
    fn test_missing_company_name() {
        let mut header = BatchHeader::parse(LINE);
        header.company_name.clear();
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name, "CompanyName");
        assert_eq!(err.kind, FieldErrorKind::FieldInclusion);
    }
}
