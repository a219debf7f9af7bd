//! IAT addenda: the mandatory 10 through 16 chain plus optional 17 and 18
//!
//! Every IAT addenda ends with the entry detail sequence number, the last
//! seven digits of the owning entry's trace number.

use super::super::field::{
    alpha_field, numeric_field, require_alphanumeric, require_nonzero, require_text,
    require_width, Slots,
};
use super::super::{AddendaRecord, Record};
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose codes allowed in Addenda10
pub const IAT_TRANSACTION_TYPE_CODES: [&str; 17] = [
    "ANN", "BUS", "DEP", "LOA", "MIS", "MOR", "PEN", "RLS", "REM", "SAL", "TAX", "TEL",
    "WEB", "ARC", "BOC", "POP", "RCK",
];

/// 01 national clearing system, 02 BIC, 03 IBAN
fn check_qualifier(field_name: &str, value: &str) -> Result<(), FieldError> {
    if matches!(value, "01" | "02" | "03") {
        return Ok(());
    }
    Err(FieldError::new(field_name, value, FieldErrorKind::IdNumberQualifier))
}

fn check_entry_sequence(value: u32) -> Result<(), FieldError> {
    require_nonzero("EntryDetailSequenceNumber", u64::from(value))?;
    require_width("EntryDetailSequenceNumber", u64::from(value), 7)
}

/// Transaction type, foreign amount and receiver name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda10 {
    pub transaction_type_code: String,
    pub foreign_payment_amount: u64,
    pub foreign_trace_number: String,
    pub name: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda10 {
    const NAME: &'static str = "Addenda10";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda10::default();
        };
        Addenda10 {
            transaction_type_code: s.alpha(3..6),
            foreign_payment_amount: s.number(6..24),
            foreign_trace_number: s.alpha(24..46),
            name: s.alpha(46..81),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !IAT_TRANSACTION_TYPE_CODES.contains(&self.transaction_type_code.as_str()) {
            return Err(FieldError::new(
                "TransactionTypeCode",
                &self.transaction_type_code,
                FieldErrorKind::IatTransactionType,
            ));
        }
        require_width("ForeignPaymentAmount", self.foreign_payment_amount, 18)?;
        require_alphanumeric("ForeignTraceNumber", &self.foreign_trace_number)?;
        require_text("Name", &self.name)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda10 {
    const TYPE_CODE: &'static str = "10";
}

impl fmt::Display for Addenda10 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "710{}{}{}{}{:6}{}",
            alpha_field(&self.transaction_type_code, 3),
            numeric_field(self.foreign_payment_amount, 18),
            alpha_field(&self.foreign_trace_number, 22),
            alpha_field(&self.name, 35),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Originator name and street address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda11 {
    pub originator_name: String,
    pub originator_street_address: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda11 {
    const NAME: &'static str = "Addenda11";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda11::default();
        };
        Addenda11 {
            originator_name: s.alpha(3..38),
            originator_street_address: s.alpha(38..73),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("OriginatorName", &self.originator_name)?;
        require_text("OriginatorStreetAddress", &self.originator_street_address)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda11 {
    const TYPE_CODE: &'static str = "11";
}

impl fmt::Display for Addenda11 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "711{}{}{:14}{}",
            alpha_field(&self.originator_name, 35),
            alpha_field(&self.originator_street_address, 35),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Originator city, state, country and postal code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda12 {
    /// City and state or province separated by `*`, terminated by `\`
    pub originator_city_state_province: String,
    /// Country and postal code separated by `*`, terminated by `\`
    pub originator_country_postal_code: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda12 {
    const NAME: &'static str = "Addenda12";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda12::default();
        };
        Addenda12 {
            originator_city_state_province: s.alpha(3..38),
            originator_country_postal_code: s.alpha(38..73),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text(
            "OriginatorCityStateProvince",
            &self.originator_city_state_province,
        )?;
        require_text(
            "OriginatorCountryPostalCode",
            &self.originator_country_postal_code,
        )?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda12 {
    const TYPE_CODE: &'static str = "12";
}

impl fmt::Display for Addenda12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "712{}{}{:14}{}",
            alpha_field(&self.originator_city_state_province, 35),
            alpha_field(&self.originator_country_postal_code, 35),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Originating bank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda13 {
    pub odfi_name: String,
    pub odfi_id_number_qualifier: String,
    pub odfi_identification: String,
    pub odfi_branch_country_code: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda13 {
    const NAME: &'static str = "Addenda13";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda13::default();
        };
        Addenda13 {
            odfi_name: s.alpha(3..38),
            odfi_id_number_qualifier: s.alpha(38..40),
            odfi_identification: s.alpha(40..74),
            odfi_branch_country_code: s.alpha(74..77),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("ODFIName", &self.odfi_name)?;
        check_qualifier("ODFIIDNumberQualifier", &self.odfi_id_number_qualifier)?;
        require_text("ODFIIdentification", &self.odfi_identification)?;
        require_text("ODFIBranchCountryCode", &self.odfi_branch_country_code)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda13 {
    const TYPE_CODE: &'static str = "13";
}

impl fmt::Display for Addenda13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "713{}{}{}{}{:10}{}",
            alpha_field(&self.odfi_name, 35),
            alpha_field(&self.odfi_id_number_qualifier, 2),
            alpha_field(&self.odfi_identification, 34),
            alpha_field(&self.odfi_branch_country_code, 3),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Receiving bank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda14 {
    pub rdfi_name: String,
    pub rdfi_id_number_qualifier: String,
    pub rdfi_identification: String,
    pub rdfi_branch_country_code: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda14 {
    const NAME: &'static str = "Addenda14";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda14::default();
        };
        Addenda14 {
            rdfi_name: s.alpha(3..38),
            rdfi_id_number_qualifier: s.alpha(38..40),
            rdfi_identification: s.alpha(40..74),
            rdfi_branch_country_code: s.alpha(74..77),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("RDFIName", &self.rdfi_name)?;
        check_qualifier("RDFIIDNumberQualifier", &self.rdfi_id_number_qualifier)?;
        require_text("RDFIIdentification", &self.rdfi_identification)?;
        require_text("RDFIBranchCountryCode", &self.rdfi_branch_country_code)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda14 {
    const TYPE_CODE: &'static str = "14";
}

impl fmt::Display for Addenda14 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "714{}{}{}{}{:10}{}",
            alpha_field(&self.rdfi_name, 35),
            alpha_field(&self.rdfi_id_number_qualifier, 2),
            alpha_field(&self.rdfi_identification, 34),
            alpha_field(&self.rdfi_branch_country_code, 3),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Receiver identification and street address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda15 {
    pub receiver_id_number: String,
    pub receiver_street_address: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda15 {
    const NAME: &'static str = "Addenda15";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda15::default();
        };
        Addenda15 {
            receiver_id_number: s.alpha(3..18),
            receiver_street_address: s.alpha(18..53),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_alphanumeric("ReceiverIDNumber", &self.receiver_id_number)?;
        require_text("ReceiverStreetAddress", &self.receiver_street_address)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda15 {
    const TYPE_CODE: &'static str = "15";
}

impl fmt::Display for Addenda15 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "715{}{}{:34}{}",
            alpha_field(&self.receiver_id_number, 15),
            alpha_field(&self.receiver_street_address, 35),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Receiver city, state, country and postal code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda16 {
    pub receiver_city_state_province: String,
    pub receiver_country_postal_code: String,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda16 {
    const NAME: &'static str = "Addenda16";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda16::default();
        };
        Addenda16 {
            receiver_city_state_province: s.alpha(3..38),
            receiver_country_postal_code: s.alpha(38..73),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("ReceiverCityStateProvince", &self.receiver_city_state_province)?;
        require_text("ReceiverCountryPostalCode", &self.receiver_country_postal_code)?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda16 {
    const TYPE_CODE: &'static str = "16";
}

impl fmt::Display for Addenda16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "716{}{}{:14}{}",
            alpha_field(&self.receiver_city_state_province, 35),
            alpha_field(&self.receiver_country_postal_code, 35),
            "",
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Optional IAT payment information, at most two per entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda17 {
    pub payment_related_information: String,
    pub sequence_number: u32,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda17 {
    const NAME: &'static str = "Addenda17";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda17::default();
        };
        Addenda17 {
            payment_related_information: s.alpha(3..83),
            sequence_number: s.number_u32(83..87),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_alphanumeric("PaymentRelatedInformation", &self.payment_related_information)?;
        require_nonzero("SequenceNumber", u64::from(self.sequence_number))?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda17 {
    const TYPE_CODE: &'static str = "17";
}

impl fmt::Display for Addenda17 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "717{}{}{}",
            alpha_field(&self.payment_related_information, 80),
            numeric_field(u64::from(self.sequence_number), 4),
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

/// Foreign correspondent bank, at most five per entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda18 {
    pub foreign_correspondent_bank_name: String,
    pub foreign_correspondent_bank_id_number_qualifier: String,
    pub foreign_correspondent_bank_id_number: String,
    pub foreign_correspondent_bank_branch_country_code: String,
    pub sequence_number: u32,
    pub entry_detail_sequence_number: u32,
}

impl Record for Addenda18 {
    const NAME: &'static str = "Addenda18";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda18::default();
        };
        Addenda18 {
            foreign_correspondent_bank_name: s.alpha(3..38),
            foreign_correspondent_bank_id_number_qualifier: s.alpha(38..40),
            foreign_correspondent_bank_id_number: s.alpha(40..74),
            foreign_correspondent_bank_branch_country_code: s.alpha(74..77),
            sequence_number: s.number_u32(83..87),
            entry_detail_sequence_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("ForeignCorrespondentBankName", &self.foreign_correspondent_bank_name)?;
        check_qualifier(
            "ForeignCorrespondentBankIDNumberQualifier",
            &self.foreign_correspondent_bank_id_number_qualifier,
        )?;
        require_text(
            "ForeignCorrespondentBankIDNumber",
            &self.foreign_correspondent_bank_id_number,
        )?;
        require_text(
            "ForeignCorrespondentBankBranchCountryCode",
            &self.foreign_correspondent_bank_branch_country_code,
        )?;
        require_nonzero("SequenceNumber", u64::from(self.sequence_number))?;
        check_entry_sequence(self.entry_detail_sequence_number)
    }
}

impl AddendaRecord for Addenda18 {
    const TYPE_CODE: &'static str = "18";
}

impl fmt::Display for Addenda18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "718{}{}{}{}{:6}{}{}",
            alpha_field(&self.foreign_correspondent_bank_name, 35),
            alpha_field(&self.foreign_correspondent_bank_id_number_qualifier, 2),
            alpha_field(&self.foreign_correspondent_bank_id_number, 34),
            alpha_field(&self.foreign_correspondent_bank_branch_country_code, 3),
            "",
            numeric_field(u64::from(self.sequence_number), 4),
            numeric_field(u64::from(self.entry_detail_sequence_number), 7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_10: &str = "710ANN000000000000100000928383-23938          BEK Enterprises                          0000001";
    const LINE_13: &str = "713Wells Fargo                        01121042882                         US           0000001";
    const LINE_18: &str = "718Bank of Germany                    01987987987654654                   DE       00010000001";

    #[test]
    fn test_addenda10_parse_and_round_trip() {
        assert_eq!(LINE_10.len(), 94);
        let addenda = Addenda10::parse(LINE_10);
        assert_eq!(addenda.transaction_type_code, "ANN");
        assert_eq!(addenda.foreign_payment_amount, 100000);
        assert_eq!(addenda.foreign_trace_number, "928383-23938");
        assert_eq!(addenda.name, "BEK Enterprises");
        assert_eq!(addenda.entry_detail_sequence_number, 1);
        assert!(addenda.validate().is_ok());
        assert_eq!(addenda.to_string(), LINE_10);
    }

    #[test]
    fn test_addenda10_rejects_unknown_transaction_type() {
        let mut addenda = Addenda10::parse(LINE_10);
        addenda.transaction_type_code = "XYZ".into();
        assert_eq!(
            addenda.validate().unwrap_err().kind,
            FieldErrorKind::IatTransactionType
        );
    }

    #[test]
    fn test_addenda13_parse_and_qualifier() {
        assert_eq!(LINE_13.len(), 94);
        let mut addenda = Addenda13::parse(LINE_13);
        assert_eq!(addenda.odfi_name, "Wells Fargo");
        assert_eq!(addenda.odfi_identification, "121042882");
        assert_eq!(addenda.odfi_branch_country_code, "US");
        assert!(addenda.validate().is_ok());
        assert_eq!(addenda.to_string(), LINE_13);
        addenda.odfi_id_number_qualifier = "04".into();
        assert_eq!(
            addenda.validate().unwrap_err().kind,
            FieldErrorKind::IdNumberQualifier
        );
    }

    #[test]
    fn test_addenda18_parse_and_round_trip() {
        assert_eq!(LINE_18.len(), 94);
        let addenda = Addenda18::parse(LINE_18);
        assert_eq!(addenda.foreign_correspondent_bank_name, "Bank of Germany");
        assert_eq!(addenda.foreign_correspondent_bank_id_number, "987987987654654");
        assert_eq!(addenda.sequence_number, 1);
        assert!(addenda.validate().is_ok());
        assert_eq!(addenda.to_string(), LINE_18);
    }

    #[test]
    fn test_missing_entry_sequence_number() {
        let addenda = Addenda11 {
            originator_name: "BEK Solutions".into(),
            originator_street_address: "15 West Place Street".into(),
            entry_detail_sequence_number: 0,
        };
        assert_eq!(
            addenda.validate().unwrap_err().field_name,
            "EntryDetailSequenceNumber"
        );
    }
}
