//! Batch Control record (`8`)

use super::field::{
    alpha_field, numeric_field, require_alphanumeric, require_numeric, require_width,
    string_field, Slots,
};
use super::Record;
use crate::types::codes::is_valid_service_class;
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closes a batch with totals tabulated from its entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchControl {
    pub service_class_code: u16,
    /// Entries plus their addenda records
    pub entry_addenda_count: u32,
    /// Sum of RDFI identifications, last 10 digits
    pub entry_hash: u64,
    pub total_debit_entry_dollar_amount: u64,
    pub total_credit_entry_dollar_amount: u64,
    pub company_identification: String,
    pub message_authentication_code: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl Record for BatchControl {
    const NAME: &'static str = "BatchControl";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return BatchControl::default();
        };
        BatchControl {
            service_class_code: s.number_u16(1..4),
            entry_addenda_count: s.number_u32(4..10),
            entry_hash: s.number(10..20),
            total_debit_entry_dollar_amount: s.number(20..32),
            total_credit_entry_dollar_amount: s.number(32..44),
            company_identification: s.alpha(44..54),
            message_authentication_code: s.alpha(54..73),
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
        require_width("EntryAddendaCount", u64::from(self.entry_addenda_count), 6)?;
        require_width("TotalDebitEntryDollarAmount", self.total_debit_entry_dollar_amount, 12)?;
        require_width("TotalCreditEntryDollarAmount", self.total_credit_entry_dollar_amount, 12)?;
        require_alphanumeric("CompanyIdentification", &self.company_identification)?;
        require_alphanumeric("MessageAuthenticationCode", &self.message_authentication_code)?;
        require_numeric("ODFIIdentification", &self.odfi_identification)
    }
}

impl fmt::Display for BatchControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "8{}{}{}{}{}{}{}{:6}{}{}",
            numeric_field(u64::from(self.service_class_code), 3),
            numeric_field(u64::from(self.entry_addenda_count), 6),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit_entry_dollar_amount, 12),
            numeric_field(self.total_credit_entry_dollar_amount, 12),
            alpha_field(&self.company_identification, 10),
            alpha_field(&self.message_authentication_code, 19),
            "",
            string_field(&self.odfi_identification, 8),
            numeric_field(u64::from(self.batch_number), 7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "82200000020023138010000000000000000000025000231380104                          121042880000001";

    #[test]
    fn test_parse_and_round_trip() {
        assert_eq!(LINE.len(), 94);
        let control = BatchControl::parse(LINE);
        assert_eq!(control.service_class_code, 220);
        assert_eq!(control.entry_addenda_count, 2);
        assert_eq!(control.entry_hash, 23138010);
        assert_eq!(control.total_debit_entry_dollar_amount, 0);
        assert_eq!(control.total_credit_entry_dollar_amount, 25000);
        assert_eq!(control.company_identification, "231380104");
        assert_eq!(control.odfi_identification, "12104288");
        assert_eq!(control.batch_number, 1);
        assert!(control.validate().is_ok());
        assert_eq!(control.to_string(), LINE);
    }

    #[test]
    fn test_wrong_width_is_zero_value() {
        assert_eq!(BatchControl::parse("8220"), BatchControl::default());
    }
}
