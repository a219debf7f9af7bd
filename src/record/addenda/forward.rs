//! Forward addenda: 02 (terminal information) and 05 (payment information)

use super::super::field::{
    alpha_field, is_valid_mmdd, numeric_field, require_alphanumeric, require_nonzero,
    require_text, require_width, string_field, Slots,
};
use super::super::{AddendaRecord, Record};
use super::txp::AddendaTxp;
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-of-sale terminal details for POS, SHR and MTE entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda02 {
    pub reference_information_one: String,
    pub reference_information_two: String,
    pub terminal_identification_code: String,
    pub transaction_serial_number: String,
    /// MMDD
    pub transaction_date: String,
    pub authorization_code_or_expire_date: String,
    pub terminal_location: String,
    pub terminal_city: String,
    pub terminal_state: String,
    /// Trace number of the entry this addenda belongs to
    pub trace_number: String,
}

impl Record for Addenda02 {
    const NAME: &'static str = "Addenda02";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda02::default();
        };
        Addenda02 {
            reference_information_one: s.alpha(3..10),
            reference_information_two: s.alpha(10..13),
            terminal_identification_code: s.alpha(13..19),
            transaction_serial_number: s.alpha(19..25),
            transaction_date: s.alpha(25..29),
            authorization_code_or_expire_date: s.alpha(29..35),
            terminal_location: s.alpha(35..62),
            terminal_city: s.alpha(62..77),
            terminal_state: s.alpha(77..79),
            trace_number: s.alpha(79..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_alphanumeric("ReferenceInformationOne", &self.reference_information_one)?;
        require_alphanumeric("ReferenceInformationTwo", &self.reference_information_two)?;
        require_text("TerminalIdentificationCode", &self.terminal_identification_code)?;
        require_text("TransactionSerialNumber", &self.transaction_serial_number)?;
        if !is_valid_mmdd(&self.transaction_date) {
            return Err(FieldError::new(
                "TransactionDate",
                &self.transaction_date,
                FieldErrorKind::InvalidDate,
            ));
        }
        require_alphanumeric(
            "AuthorizationCodeOrExpireDate",
            &self.authorization_code_or_expire_date,
        )?;
        require_text("TerminalLocation", &self.terminal_location)?;
        require_text("TerminalCity", &self.terminal_city)?;
        require_text("TerminalState", &self.terminal_state)
    }
}

impl AddendaRecord for Addenda02 {
    const TYPE_CODE: &'static str = "02";
}

impl fmt::Display for Addenda02 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "702{}{}{}{}{}{}{}{}{}{}",
            alpha_field(&self.reference_information_one, 7),
            alpha_field(&self.reference_information_two, 3),
            alpha_field(&self.terminal_identification_code, 6),
            alpha_field(&self.transaction_serial_number, 6),
            alpha_field(&self.transaction_date, 4),
            alpha_field(&self.authorization_code_or_expire_date, 6),
            alpha_field(&self.terminal_location, 27),
            alpha_field(&self.terminal_city, 15),
            alpha_field(&self.terminal_state, 2),
            string_field(&self.trace_number, 15),
        )
    }
}

/// Free-form payment related information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda05 {
    pub payment_related_information: String,
    /// Position of this addenda among the entry's addenda, starting at 1
    pub sequence_number: u32,
    /// Last 7 digits of the entry trace number
    pub entry_detail_sequence_number: u32,
}

impl Addenda05 {
    pub fn new(payment_related_information: &str) -> Self {
        Addenda05 {
            payment_related_information: payment_related_information.to_string(),
            ..Addenda05::default()
        }
    }

    /// Whether the payment information is a TXP tax payment segment
    pub fn is_txp(&self) -> bool {
        self.payment_related_information.starts_with("TXP*")
    }

    /// Decode the payment information as a TXP segment
    pub fn txp(&self) -> AddendaTxp {
        AddendaTxp::parse(&self.payment_related_information)
    }
}

impl Record for Addenda05 {
    const NAME: &'static str = "Addenda05";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda05::default();
        };
        Addenda05 {
            payment_related_information: s.alpha(3..83),
            sequence_number: s.number_u32(83..87),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_alphanumeric("PaymentRelatedInformation", &self.payment_related_information)?;
        require_nonzero("SequenceNumber", u64::from(self.sequence_number))?;
        require_width("SequenceNumber", u64::from(self.sequence_number), 4)?;
        require_nonzero(
            "EntryDetailSequenceNumber",
            u64::from(self.entry_detail_sequence_number),
        )
    }
}

impl AddendaRecord for Addenda05 {
    const TYPE_CODE: &'static str = "05";
}

impl fmt::Display for Addenda05 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "705{}{}{}",
            alpha_field(&self.payment_related_information, 80),
            numeric_field(u64::from(self.sequence_number), 4),
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_02: &str = "702REFONEAREF0000012345671030000123Target Store 0049          PHILADELPHIA   PA121042880000001";
    const LINE_05: &str = "705Vacation pay                                                                    00010000001";

    #[test]
    fn test_addenda02_parse_and_round_trip() {
        assert_eq!(LINE_02.len(), 94);
        let addenda = Addenda02::parse(LINE_02);
        assert_eq!(addenda.reference_information_one, "REFONEA");
        assert_eq!(addenda.terminal_identification_code, "000001");
        assert_eq!(addenda.transaction_serial_number, "234567");
        assert_eq!(addenda.transaction_date, "1030");
        assert_eq!(addenda.terminal_city, "PHILADELPHIA");
        assert_eq!(addenda.terminal_state, "PA");
        assert_eq!(addenda.trace_number, "121042880000001");
        assert!(addenda.validate().is_ok());
        assert_eq!(addenda.to_string(), LINE_02);
        assert_eq!(addenda.type_code(), "02");
    }

    #[test]
    fn test_addenda02_requires_terminal_state() {
        let mut addenda = Addenda02::parse(LINE_02);
        addenda.terminal_state.clear();
        let err = addenda.validate().unwrap_err();
        assert_eq!(err.field_name, "TerminalState");
        assert_eq!(err.kind, FieldErrorKind::FieldInclusion);
    }

    #[test]
    fn test_addenda05_parse_and_round_trip() {
        assert_eq!(LINE_05.len(), 94);
        let addenda = Addenda05::parse(LINE_05);
        assert_eq!(addenda.payment_related_information, "Vacation pay");
        assert_eq!(addenda.sequence_number, 1);
        assert_eq!(addenda.entry_detail_sequence_number, 1);
        assert!(addenda.validate().is_ok());
        assert_eq!(addenda.to_string(), LINE_05);
        assert!(!addenda.is_txp());
    }

    #[test]
    fn test_addenda05_short_line_is_zero_value() {
        let addenda = Addenda05::parse(&LINE_05[..80]);
        assert_eq!(addenda, Addenda05::default());
        assert_eq!(addenda.validate().unwrap_err().field_name, "SequenceNumber");
    }
}
