//! Automated accounting advice (ADV) records
//!
//! ADV batches report settlement activity from an ACH operator to a bank.
//! Entries, batch control and file control use wider amount slots than the
//! standard records and entries carry no trace number.

use super::addenda::Addenda99;
use super::entry_detail::Category;
use super::field::{
    alpha_field, check_rdfi, numeric_field, require_alphanumeric, require_nonzero,
    require_numeric, require_present, require_width, split_field, string_field, Slots,
};
use super::Record;
use crate::types::codes::{adv_direction, is_valid_adv_transaction_code, Direction};
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single accounting advice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvEntryDetail {
    /// 81-88
    pub transaction_code: u8,
    pub rdfi_identification: String,
    pub check_digit: String,
    pub dfi_account_number: String,
    pub amount: u64,
    pub advice_routing_number: String,
    pub file_identification: String,
    pub ach_operator_data: String,
    pub individual_name: String,
    pub discretionary_data: String,
    pub addenda_record_indicator: u8,
    pub ach_operator_routing_number: String,
    /// Day of the year the advice was created
    pub julian_day: u16,
    pub sequence_number: u32,
    pub addenda99: Option<Addenda99>,
    pub category: Category,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl AdvEntryDetail {
    pub fn new(transaction_code: u8) -> Self {
        AdvEntryDetail {
            transaction_code,
            ..AdvEntryDetail::default()
        }
    }

    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    pub fn set_rdfi(&mut self, routing: &str) {
        let (identification, check_digit) = split_field(routing, 9, 8);
        self.rdfi_identification = identification;
        self.check_digit = check_digit;
    }

    pub fn credit_or_debit(&self) -> Option<Direction> {
        adv_direction(self.transaction_code)
    }

    pub fn set_addenda99(&mut self, addenda: Addenda99) {
        self.addenda99 = Some(addenda);
        self.category = Category::Return;
        self.addenda_record_indicator = 1;
    }

    pub fn addenda_count(&self) -> usize {
        usize::from(self.addenda99.is_some())
    }

    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validate_opts.as_ref()
    }

    /// Validate with explicit overrides, ignoring any installed by `set_validation`
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<(), FieldError> {
        if opts.skip_all {
            return Ok(());
        }
        if !opts.accepts_transaction_code(self.transaction_code, is_valid_adv_transaction_code) {
            return Err(FieldError::new(
                "TransactionCode",
                self.transaction_code,
                FieldErrorKind::TransactionCode,
            ));
        }
        check_rdfi(&self.rdfi_identification, &self.check_digit)?;
        require_present("DFIAccountNumber", &self.dfi_account_number)?;
        require_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        require_width("Amount", self.amount, 12)?;
        require_present("AdviceRoutingNumber", &self.advice_routing_number)?;
        require_numeric("AdviceRoutingNumber", &self.advice_routing_number)?;
        require_alphanumeric("FileIdentification", &self.file_identification)?;
        require_alphanumeric("ACHOperatorData", &self.ach_operator_data)?;
        require_alphanumeric("IndividualName", &self.individual_name)?;
        require_alphanumeric("DiscretionaryData", &self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(FieldError::new(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
                FieldErrorKind::AddendaRecordIndicator,
            ));
        }
        require_present("ACHOperatorRoutingNumber", &self.ach_operator_routing_number)?;
        require_numeric("ACHOperatorRoutingNumber", &self.ach_operator_routing_number)?;
        if !(1..=366).contains(&self.julian_day) {
            return Err(FieldError::new(
                "JulianDay",
                self.julian_day,
                FieldErrorKind::InvalidDate,
            ));
        }
        require_nonzero("SequenceNumber", u64::from(self.sequence_number))?;
        if let Some(addenda) = &self.addenda99 {
            let mut addenda = addenda.clone();
            addenda.set_validation(opts.clone());
            addenda.validate()?;
        }
        Ok(())
    }
}

impl Record for AdvEntryDetail {
    const NAME: &'static str = "ADVEntryDetail";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return AdvEntryDetail::default();
        };
        AdvEntryDetail {
            transaction_code: s.number_u8(1..3),
            rdfi_identification: s.alpha(3..11),
            check_digit: s.alpha(11..12),
            dfi_account_number: s.alpha(12..27),
            amount: s.number(27..39),
            advice_routing_number: s.alpha(39..48),
            file_identification: s.alpha(48..53),
            ach_operator_data: s.alpha(53..54),
            individual_name: s.alpha(54..76),
            discretionary_data: s.alpha(76..78),
            addenda_record_indicator: s.number_u8(78..79),
            ach_operator_routing_number: s.alpha(79..87),
            julian_day: s.number_u16(87..90),
            sequence_number: s.number_u32(90..94),
            ..AdvEntryDetail::default()
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        self.validate_with(&self.validate_opts.clone().unwrap_or_default())
    }
}

impl fmt::Display for AdvEntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "6{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(u64::from(self.transaction_code), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            alpha_field(&self.dfi_account_number, 15),
            numeric_field(self.amount, 12),
            string_field(&self.advice_routing_number, 9),
            alpha_field(&self.file_identification, 5),
            alpha_field(&self.ach_operator_data, 1),
            alpha_field(&self.individual_name, 22),
            alpha_field(&self.discretionary_data, 2),
            numeric_field(u64::from(self.addenda_record_indicator), 1),
            string_field(&self.ach_operator_routing_number, 8),
            numeric_field(u64::from(self.julian_day), 3),
            numeric_field(u64::from(self.sequence_number), 4),
        )
    }
}

/// Batch control of an ADV batch, with 20-digit totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvBatchControl {
    pub service_class_code: u16,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit_entry_dollar_amount: u64,
    pub total_credit_entry_dollar_amount: u64,
    pub ach_operator_data: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl Record for AdvBatchControl {
    const NAME: &'static str = "ADVBatchControl";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return AdvBatchControl::default();
        };
        AdvBatchControl {
            service_class_code: s.number_u16(1..4),
            entry_addenda_count: s.number_u32(4..10),
            entry_hash: s.number(10..20),
            total_debit_entry_dollar_amount: s.number(20..40),
            total_credit_entry_dollar_amount: s.number(40..60),
            ach_operator_data: s.alpha(60..79),
            odfi_identification: s.alpha(79..87),
            batch_number: s.number_u32(87..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.service_class_code != crate::types::codes::AUTOMATED_ACCOUNTING_ADVICES {
            return Err(FieldError::new(
                "ServiceClassCode",
                self.service_class_code,
                FieldErrorKind::ServiceClass,
            ));
        }
        require_width("EntryAddendaCount", u64::from(self.entry_addenda_count), 6)?;
        require_alphanumeric("ACHOperatorData", &self.ach_operator_data)?;
        require_numeric("ODFIIdentification", &self.odfi_identification)
    }
}

impl fmt::Display for AdvBatchControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "8{}{}{}{}{}{}{}{}",
            numeric_field(u64::from(self.service_class_code), 3),
            numeric_field(u64::from(self.entry_addenda_count), 6),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit_entry_dollar_amount, 20),
            numeric_field(self.total_credit_entry_dollar_amount, 20),
            alpha_field(&self.ach_operator_data, 19),
            string_field(&self.odfi_identification, 8),
            numeric_field(u64::from(self.batch_number), 7),
        )
    }
}

/// File control of a file of ADV batches, with 20-digit totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvFileControl {
    pub batch_count: u32,
    pub block_count: u32,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit_entry_dollar_amount: u64,
    pub total_credit_entry_dollar_amount: u64,
}

impl Record for AdvFileControl {
    const NAME: &'static str = "ADVFileControl";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return AdvFileControl::default();
        };
        AdvFileControl {
            batch_count: s.number_u32(1..7),
            block_count: s.number_u32(7..13),
            entry_addenda_count: s.number_u32(13..21),
            entry_hash: s.number(21..31),
            total_debit_entry_dollar_amount: s.number(31..51),
            total_credit_entry_dollar_amount: s.number(51..71),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_width("BatchCount", u64::from(self.batch_count), 6)?;
        require_width("BlockCount", u64::from(self.block_count), 6)?;
        require_width("EntryAddendaCount", u64::from(self.entry_addenda_count), 8)?;
        require_width("EntryHash", self.entry_hash, 10)
    }
}

impl fmt::Display for AdvFileControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "9{}{}{}{}{}{}{:23}",
            numeric_field(u64::from(self.batch_count), 6),
            numeric_field(u64::from(self.block_count), 6),
            numeric_field(u64::from(self.entry_addenda_count), 8),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit_entry_dollar_amount, 20),
            numeric_field(self.total_credit_entry_dollar_amount, 20),
            "",
        )
    }
}
