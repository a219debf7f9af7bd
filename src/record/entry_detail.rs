//! Entry Detail record (`6`)
//!
//! One transaction line. Several slots are overloaded by SEC code: the
//! identification number carries a check serial number for ARC/BOC/RCK, the
//! individual name carries the addenda count for CTX/TRX, and so on. The
//! accessors below expose those overloaded views without changing the stored
//! slots.

use super::addenda::{Addenda02, Addenda05, Addenda98, Addenda99};
use super::field::{
    alpha_field, check_rdfi, numeric_field, require_alphanumeric, require_numeric,
    require_present, require_width, split_field, string_field, sub_slot, Slots,
};
use super::Record;
use crate::types::codes::{self, is_valid_transaction_code, Direction};
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an entry is an original, a return or a notification of change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Forward,
    Return,
    Noc,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Forward => "Forward",
            Category::Return => "Return",
            Category::Noc => "NOC",
        })
    }
}

/// A single debit or credit to a receiver's account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub transaction_code: u8,
    /// First 8 digits of the receiving bank routing number
    pub rdfi_identification: String,
    /// 9th digit of the routing number
    pub check_digit: String,
    pub dfi_account_number: String,
    /// Cents
    pub amount: u64,
    pub identification_number: String,
    pub individual_name: String,
    pub discretionary_data: String,
    /// 1 iff at least one addenda record follows the entry
    pub addenda_record_indicator: u8,
    /// ODFI identification followed by a 7-digit sequence number
    pub trace_number: String,
    pub addenda02: Option<Addenda02>,
    pub addenda05: Vec<Addenda05>,
    pub addenda98: Option<Addenda98>,
    pub addenda99: Option<Addenda99>,
    pub category: Category,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl EntryDetail {
    pub fn new(transaction_code: u8) -> Self {
        EntryDetail {
            transaction_code,
            ..EntryDetail::default()
        }
    }

    /// Install validation overrides for this entry
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    /// Split a 9-digit routing number into identification and check digit
    pub fn set_rdfi(&mut self, routing: &str) {
        let (identification, check_digit) = split_field(routing, 9, 8);
        self.rdfi_identification = identification;
        self.check_digit = check_digit;
    }

    /// ODFI identification plus a 7-digit sequence number
    pub fn set_trace_number(&mut self, odfi_identification: &str, sequence: u32) {
        self.trace_number = format!(
            "{}{}",
            string_field(odfi_identification, 8),
            numeric_field(u64::from(sequence), 7)
        );
    }

    /// Last 7 digits of the trace number
    pub fn trace_sequence(&self) -> u32 {
        trace_sequence(&self.trace_number)
    }

    /// Debit or credit, derived from the transaction code
    pub fn credit_or_debit(&self) -> Option<Direction> {
        codes::direction(self.transaction_code)
    }

    pub fn is_prenote(&self) -> bool {
        codes::is_prenote(self.transaction_code)
    }

    /// Number of attached addenda records
    pub fn addenda_count(&self) -> usize {
        usize::from(self.addenda02.is_some())
            + self.addenda05.len()
            + usize::from(self.addenda98.is_some())
            + usize::from(self.addenda99.is_some())
    }

    /// Attach an Addenda05 and raise the addenda indicator
    pub fn add_addenda05(&mut self, addenda: Addenda05) {
        self.addenda05.push(addenda);
        self.addenda_record_indicator = 1;
    }

    pub fn set_addenda02(&mut self, addenda: Addenda02) {
        self.addenda02 = Some(addenda);
        self.addenda_record_indicator = 1;
    }

    /// Attach a notification of change; the entry becomes a NOC
    pub fn set_addenda98(&mut self, addenda: Addenda98) {
        self.addenda98 = Some(addenda);
        self.category = Category::Noc;
        self.addenda_record_indicator = 1;
    }

    /// Attach a return; the entry becomes a return
    pub fn set_addenda99(&mut self, addenda: Addenda99) {
        self.addenda99 = Some(addenda);
        self.category = Category::Return;
        self.addenda_record_indicator = 1;
    }

    /// Check serial number (ARC, BOC, RCK, TRC, XCK)
    pub fn check_serial_number(&self) -> String {
        self.identification_number.trim().to_string()
    }

    /// Check serial number of a POP entry (positions 40-48)
    pub fn pop_check_serial_number(&self) -> String {
        sub_slot(&self.identification_number, 15, 0..9)
    }

    /// Terminal city abbreviation of a POP entry (positions 49-52)
    pub fn pop_terminal_city(&self) -> String {
        sub_slot(&self.identification_number, 15, 9..13)
    }

    /// Terminal state of a POP entry (positions 53-54)
    pub fn pop_terminal_state(&self) -> String {
        sub_slot(&self.identification_number, 15, 13..15)
    }

    /// Number of Addenda05 records declared by a CTX, TRX, ATX or ENR entry
    pub fn catx_addenda_records(&self) -> u32 {
        let declared = sub_slot(&self.individual_name, 22, 0..4);
        u32::try_from(super::field::parse_num(&declared)).unwrap_or(0)
    }

    /// Receiving company name of a CTX, TRX, ATX or ENR entry
    pub fn catx_receiving_company(&self) -> String {
        sub_slot(&self.individual_name, 22, 4..20)
    }

    pub fn set_catx_addenda_records(&mut self, count: u32) {
        let company = self.catx_receiving_company();
        self.individual_name = format!(
            "{}{}",
            numeric_field(u64::from(count), 4),
            alpha_field(&company, 18)
        );
    }

    pub fn set_catx_receiving_company(&mut self, company: &str) {
        let count = self.catx_addenda_records();
        self.individual_name = format!(
            "{}{}",
            numeric_field(u64::from(count), 4),
            alpha_field(company, 18)
        );
    }

    /// Process control field of a TRC or XCK entry (positions 55-60)
    pub fn process_control_field(&self) -> String {
        sub_slot(&self.individual_name, 22, 0..6)
    }

    /// Item research number of a TRC or XCK entry (positions 61-76)
    pub fn item_research_number(&self) -> String {
        sub_slot(&self.individual_name, 22, 6..22)
    }

    /// Card transaction type of a POS, SHR or MTE entry
    pub fn card_transaction_type(&self) -> String {
        self.discretionary_data.trim().to_string()
    }

    /// Payment type code of a WEB or TEL entry
    pub fn payment_type_code(&self) -> String {
        self.discretionary_data.trim().to_string()
    }

    /// Card expiration date of an SHR entry (MMYY)
    pub fn shr_card_expiration_date(&self) -> String {
        sub_slot(&self.identification_number, 15, 0..4)
    }

    /// Document reference number of an SHR entry
    pub fn shr_document_reference_number(&self) -> String {
        sub_slot(&self.identification_number, 15, 4..15)
    }

    /// Individual card account number of an SHR entry
    pub fn shr_individual_card_account_number(&self) -> String {
        self.individual_name.trim().to_string()
    }

    /// Overrides installed by [`EntryDetail::set_validation`], if any
    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validate_opts.as_ref()
    }

    /// Validate with explicit overrides, ignoring any installed by `set_validation`
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<(), FieldError> {
        if opts.skip_all {
            return Ok(());
        }
        if !opts.accepts_transaction_code(self.transaction_code, is_valid_transaction_code) {
            return Err(FieldError::new(
                "TransactionCode",
                self.transaction_code,
                FieldErrorKind::TransactionCode,
            ));
        }
        check_rdfi(&self.rdfi_identification, &self.check_digit)?;
        require_present("DFIAccountNumber", &self.dfi_account_number)?;
        require_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        require_width("Amount", self.amount, 10)?;
        require_alphanumeric("IdentificationNumber", &self.identification_number)?;
        require_alphanumeric("IndividualName", &self.individual_name)?;
        require_alphanumeric("DiscretionaryData", &self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(FieldError::new(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
                FieldErrorKind::AddendaRecordIndicator,
            ));
        }
        require_present("TraceNumber", &self.trace_number)?;
        require_numeric("TraceNumber", &self.trace_number)?;
        if let Some(addenda) = &self.addenda02 {
            addenda.validate()?;
        }
        for addenda in &self.addenda05 {
            addenda.validate()?;
        }
        if let Some(addenda) = &self.addenda98 {
            addenda.validate()?;
        }
        if let Some(addenda) = &self.addenda99 {
            let mut addenda = addenda.clone();
            if opts.custom_return_codes {
                addenda.set_validation(opts.clone());
            }
            addenda.validate()?;
        }
        Ok(())
    }

    fn opts(&self) -> ValidateOpts {
        self.validate_opts.clone().unwrap_or_default()
    }
}

/// Last 7 digits of a 15-digit trace number
pub(crate) fn trace_sequence(trace_number: &str) -> u32 {
    let (_, sequence) = split_field(trace_number, 15, 8);
    u32::try_from(super::field::parse_num(&sequence)).unwrap_or(0)
}

impl Record for EntryDetail {
    const NAME: &'static str = "EntryDetail";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return EntryDetail::default();
        };
        EntryDetail {
            transaction_code: s.number_u8(1..3),
            rdfi_identification: s.alpha(3..11),
            check_digit: s.alpha(11..12),
            dfi_account_number: s.alpha(12..29),
            amount: s.number(29..39),
            identification_number: s.alpha(39..54),
            individual_name: s.alpha(54..76),
            discretionary_data: s.alpha(76..78),
            addenda_record_indicator: s.number_u8(78..79),
            trace_number: s.alpha(79..94),
            ..EntryDetail::default()
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        self.validate_with(&self.opts())
    }
}

impl fmt::Display for EntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "6{}{}{}{}{}{}{}{}{}{}",
            numeric_field(u64::from(self.transaction_code), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            alpha_field(&self.dfi_account_number, 17),
            numeric_field(self.amount, 10),
            alpha_field(&self.identification_number, 15),
            alpha_field(&self.individual_name, 22),
            alpha_field(&self.discretionary_data, 2),
            numeric_field(u64::from(self.addenda_record_indicator), 1),
            string_field(&self.trace_number, 15),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINE: &str = "622231380104123456789        0000025000               Receiver Account Name   1121042880000001";

    #[test]
    fn test_parse_reads_every_slot() {
        let entry = EntryDetail::parse(LINE);
        assert_eq!(entry.transaction_code, 22);
        assert_eq!(entry.rdfi_identification, "23138010");
        assert_eq!(entry.check_digit, "4");
        assert_eq!(entry.dfi_account_number, "123456789");
        assert_eq!(entry.amount, 25000);
        assert_eq!(entry.individual_name, "Receiver Account Name");
        assert_eq!(entry.addenda_record_indicator, 1);
        assert_eq!(entry.trace_number, "121042880000001");
        assert_eq!(entry.trace_sequence(), 1);
        assert_eq!(entry.credit_or_debit(), Some(Direction::Credit));
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(LINE.len(), 94);
        assert_eq!(EntryDetail::parse(LINE).to_string(), LINE);
    }

    #[test]
    fn test_validate_accepts_well_formed_entry() {
        assert!(EntryDetail::parse(LINE).validate().is_ok());
    }

    #[test]
    fn test_short_line_leaves_zero_value_caught_by_validate() {
        let entry = EntryDetail::parse(&LINE[..93]);
        assert_eq!(entry, EntryDetail::default());
        assert_eq!(
            entry.validate().unwrap_err().kind,
            FieldErrorKind::TransactionCode
        );
    }

    #[test]
    fn test_check_digit_mismatch() {
        let mut entry = EntryDetail::parse(LINE);
        entry.check_digit = "9".into();
        let err = entry.validate().unwrap_err();
        assert_eq!(err.field_name, "CheckDigit");
        assert_eq!(err.kind, FieldErrorKind::ValidCheckDigit { calculated: 4 });
    }

    #[rstest]
    #[case::bad_code("TransactionCode", |e: &mut EntryDetail| e.transaction_code = 25)]
    #[case::missing_account("DFIAccountNumber", |e: &mut EntryDetail| e.dfi_account_number.clear())]
    #[case::non_numeric_trace("TraceNumber", |e: &mut EntryDetail| e.trace_number = "12104288000000A".into())]
    #[case::indicator("AddendaRecordIndicator", |e: &mut EntryDetail| e.addenda_record_indicator = 2)]
    fn test_validate_rejects(#[case] field: &str, #[case] mutate: fn(&mut EntryDetail)) {
        let mut entry = EntryDetail::parse(LINE);
        mutate(&mut entry);
        assert_eq!(entry.validate().unwrap_err().field_name, field);
    }

    #[test]
    fn test_custom_transaction_code_override() {
        let mut entry = EntryDetail::parse(LINE);
        entry.transaction_code = 25;
        entry.set_validation(ValidateOpts {
            custom_transaction_code: Some(crate::types::TransactionCodeCheck::new(|c| c == 25)),
            ..ValidateOpts::default()
        });
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_set_rdfi_splits_routing_number() {
        let mut entry = EntryDetail::new(27);
        entry.set_rdfi("231380104");
        assert_eq!(entry.rdfi_identification, "23138010");
        assert_eq!(entry.check_digit, "4");
        entry.set_trace_number("12104288", 42);
        assert_eq!(entry.trace_number, "121042880000042");
    }

    #[test]
    fn test_set_rdfi_with_multibyte_input() {
        let mut entry = EntryDetail::new(27);
        entry.set_rdfi("1234567é9");
        assert_eq!(entry.rdfi_identification, "1234567é");
        assert_eq!(entry.check_digit, "9");
        assert_eq!(
            check_rdfi(&entry.rdfi_identification, &entry.check_digit)
                .unwrap_err()
                .kind,
            FieldErrorKind::NonNumeric
        );

        entry.trace_number = "1210428é0000042".into();
        assert_eq!(entry.trace_sequence(), 42);
    }

    #[test]
    fn test_catx_overloaded_name() {
        let mut entry = EntryDetail::new(22);
        entry.set_catx_receiving_company("Receiver Company");
        entry.set_catx_addenda_records(2);
        assert_eq!(entry.individual_name, "0002Receiver Company  ");
        assert_eq!(entry.catx_addenda_records(), 2);
        assert_eq!(entry.catx_receiving_company(), "Receiver Company");
    }

    #[test]
    fn test_pop_overloaded_identification() {
        let mut entry = EntryDetail::new(27);
        entry.identification_number = "123456789PHILPA".into();
        assert_eq!(entry.pop_check_serial_number(), "123456789");
        assert_eq!(entry.pop_terminal_city(), "PHIL");
        assert_eq!(entry.pop_terminal_state(), "PA");
    }

    #[test]
    fn test_trc_overloaded_name() {
        let mut entry = EntryDetail::new(27);
        entry.individual_name = "CHECK1ITEMRESEARCH1234".into();
        assert_eq!(entry.process_control_field(), "CHECK1");
        assert_eq!(entry.item_research_number(), "ITEMRESEARCH1234");
    }
}
