//! International ACH transaction (IAT) batch header and entry detail

use super::addenda::{
    Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15, Addenda16, Addenda17,
    Addenda18, Addenda98, Addenda99,
};
use super::entry_detail::{trace_sequence, Category};
use super::field::{
    alpha_field, check_rdfi, is_numeric, is_valid_yymmdd, numeric_field, require_alphanumeric,
    require_nonzero, require_numeric, require_present, require_text, require_width,
    split_field, string_field, Slots,
};
use super::Record;
use crate::types::codes::{self, is_valid_service_class, is_valid_transaction_code, Direction};
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Batch header of an IAT batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IatBatchHeader {
    pub service_class_code: u16,
    /// Blank unless the batch is an IAT correction
    pub iat_indicator: String,
    /// FV fixed to variable, VF variable to fixed, FF fixed to fixed
    pub foreign_exchange_indicator: String,
    /// 1 rate, 2 reference number, 3 blank
    pub foreign_exchange_reference_indicator: u8,
    pub foreign_exchange_reference: String,
    pub iso_destination_country_code: String,
    pub originator_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub iso_originating_currency_code: String,
    pub iso_destination_currency_code: String,
    pub effective_entry_date: String,
    pub settlement_date: String,
    pub originator_status_code: u8,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl IatBatchHeader {
    pub fn new(service_class_code: u16) -> Self {
        IatBatchHeader {
            service_class_code,
            standard_entry_class_code: "IAT".to_string(),
            originator_status_code: 1,
            batch_number: 1,
            ..IatBatchHeader::default()
        }
    }
}

impl Record for IatBatchHeader {
    const NAME: &'static str = "IATBatchHeader";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return IatBatchHeader::default();
        };
        IatBatchHeader {
            service_class_code: s.number_u16(1..4),
            iat_indicator: s.alpha(4..20),
            foreign_exchange_indicator: s.alpha(20..22),
            foreign_exchange_reference_indicator: s.number_u8(22..23),
            foreign_exchange_reference: s.alpha(23..38),
            iso_destination_country_code: s.alpha(38..40),
            originator_identification: s.alpha(40..50),
            standard_entry_class_code: s.alpha(50..53),
            company_entry_description: s.alpha(53..63),
            iso_originating_currency_code: s.alpha(63..66),
            iso_destination_currency_code: s.alpha(66..69),
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
        require_alphanumeric("IATIndicator", &self.iat_indicator)?;
        if !matches!(self.foreign_exchange_indicator.as_str(), "FV" | "VF" | "FF") {
            return Err(FieldError::new(
                "ForeignExchangeIndicator",
                &self.foreign_exchange_indicator,
                FieldErrorKind::ForeignExchangeIndicator,
            ));
        }
        if !(1..=3).contains(&self.foreign_exchange_reference_indicator) {
            return Err(FieldError::new(
                "ForeignExchangeReferenceIndicator",
                self.foreign_exchange_reference_indicator,
                FieldErrorKind::ForeignExchangeReferenceIndicator,
            ));
        }
        require_alphanumeric("ForeignExchangeReference", &self.foreign_exchange_reference)?;
        require_text("ISODestinationCountryCode", &self.iso_destination_country_code)?;
        require_text("OriginatorIdentification", &self.originator_identification)?;
        if self.standard_entry_class_code != "IAT" {
            return Err(FieldError::new(
                "StandardEntryClassCode",
                &self.standard_entry_class_code,
                FieldErrorKind::SecCode,
            ));
        }
        require_text("CompanyEntryDescription", &self.company_entry_description)?;
        require_text("ISOOriginatingCurrencyCode", &self.iso_originating_currency_code)?;
        require_text("ISODestinationCurrencyCode", &self.iso_destination_currency_code)?;
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

impl fmt::Display for IatBatchHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "5{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(u64::from(self.service_class_code), 3),
            alpha_field(&self.iat_indicator, 16),
            alpha_field(&self.foreign_exchange_indicator, 2),
            numeric_field(u64::from(self.foreign_exchange_reference_indicator), 1),
            alpha_field(&self.foreign_exchange_reference, 15),
            alpha_field(&self.iso_destination_country_code, 2),
            alpha_field(&self.originator_identification, 10),
            alpha_field(&self.standard_entry_class_code, 3),
            alpha_field(&self.company_entry_description, 10),
            alpha_field(&self.iso_originating_currency_code, 3),
            alpha_field(&self.iso_destination_currency_code, 3),
            alpha_field(&self.effective_entry_date, 6),
            alpha_field(&self.settlement_date, 3),
            numeric_field(u64::from(self.originator_status_code), 1),
            string_field(&self.odfi_identification, 8),
            numeric_field(u64::from(self.batch_number), 7),
        )
    }
}

/// Entry of an IAT batch with its typed addenda chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IatEntryDetail {
    pub transaction_code: u8,
    pub rdfi_identification: String,
    pub check_digit: String,
    /// Number of addenda records attached, mandatory and optional
    pub addenda_records: u16,
    pub amount: u64,
    pub dfi_account_number: String,
    pub ofac_screening_indicator: String,
    pub secondary_ofac_screening_indicator: String,
    /// Always 1: the mandatory addenda chain follows every IAT entry
    pub addenda_record_indicator: u8,
    pub trace_number: String,
    pub addenda10: Option<Addenda10>,
    pub addenda11: Option<Addenda11>,
    pub addenda12: Option<Addenda12>,
    pub addenda13: Option<Addenda13>,
    pub addenda14: Option<Addenda14>,
    pub addenda15: Option<Addenda15>,
    pub addenda16: Option<Addenda16>,
    pub addenda17: Vec<Addenda17>,
    pub addenda18: Vec<Addenda18>,
    pub addenda98: Option<Addenda98>,
    pub addenda99: Option<Addenda99>,
    pub category: Category,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl IatEntryDetail {
    pub fn new(transaction_code: u8) -> Self {
        IatEntryDetail {
            transaction_code,
            addenda_record_indicator: 1,
            ..IatEntryDetail::default()
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

    pub fn set_trace_number(&mut self, odfi_identification: &str, sequence: u32) {
        self.trace_number = format!(
            "{}{}",
            string_field(odfi_identification, 8),
            numeric_field(u64::from(sequence), 7)
        );
    }

    pub fn trace_sequence(&self) -> u32 {
        trace_sequence(&self.trace_number)
    }

    pub fn credit_or_debit(&self) -> Option<Direction> {
        codes::direction(self.transaction_code)
    }

    pub fn is_prenote(&self) -> bool {
        codes::is_prenote(self.transaction_code)
    }

    /// Whether all seven mandatory addenda 10 through 16 are attached
    pub fn has_mandatory_addenda(&self) -> bool {
        self.addenda10.is_some()
            && self.addenda11.is_some()
            && self.addenda12.is_some()
            && self.addenda13.is_some()
            && self.addenda14.is_some()
            && self.addenda15.is_some()
            && self.addenda16.is_some()
    }

    /// First missing mandatory addenda type code
    pub fn missing_mandatory_addenda(&self) -> Option<&'static str> {
        [
            ("10", self.addenda10.is_some()),
            ("11", self.addenda11.is_some()),
            ("12", self.addenda12.is_some()),
            ("13", self.addenda13.is_some()),
            ("14", self.addenda14.is_some()),
            ("15", self.addenda15.is_some()),
            ("16", self.addenda16.is_some()),
        ]
        .into_iter()
        .find(|(_, present)| !present)
        .map(|(code, _)| code)
    }

    /// Number of attached addenda records
    pub fn addenda_count(&self) -> usize {
        [
            self.addenda10.is_some(),
            self.addenda11.is_some(),
            self.addenda12.is_some(),
            self.addenda13.is_some(),
            self.addenda14.is_some(),
            self.addenda15.is_some(),
            self.addenda16.is_some(),
            self.addenda98.is_some(),
            self.addenda99.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
            + self.addenda17.len()
            + self.addenda18.len()
    }

    pub fn set_addenda98(&mut self, addenda: Addenda98) {
        self.addenda98 = Some(addenda);
        self.category = Category::Noc;
    }

    pub fn set_addenda99(&mut self, addenda: Addenda99) {
        self.addenda99 = Some(addenda);
        self.category = Category::Return;
    }

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
        require_nonzero("AddendaRecords", u64::from(self.addenda_records))?;
        require_width("Amount", self.amount, 10)?;
        require_present("DFIAccountNumber", &self.dfi_account_number)?;
        require_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        require_alphanumeric("OFACScreeningIndicator", &self.ofac_screening_indicator)?;
        require_alphanumeric(
            "SecondaryOFACScreeningIndicator",
            &self.secondary_ofac_screening_indicator,
        )?;
        if self.addenda_record_indicator != 1 {
            return Err(FieldError::new(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
                FieldErrorKind::AddendaRecordIndicator,
            ));
        }
        require_present("TraceNumber", &self.trace_number)?;
        require_numeric("TraceNumber", &self.trace_number)?;
        self.validate_addenda(opts)
    }

    /// Validate every attached addenda in chain order
    fn validate_addenda(&self, opts: &ValidateOpts) -> Result<(), FieldError> {
        if let Some(a) = &self.addenda10 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda11 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda12 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda13 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda14 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda15 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda16 {
            a.validate()?;
        }
        for a in &self.addenda17 {
            a.validate()?;
        }
        for a in &self.addenda18 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda98 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda99 {
            let mut a = a.clone();
            a.set_validation(opts.clone());
            a.validate()?;
        }
        Ok(())
    }
}

impl Record for IatEntryDetail {
    const NAME: &'static str = "IATEntryDetail";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return IatEntryDetail::default();
        };
        IatEntryDetail {
            transaction_code: s.number_u8(1..3),
            rdfi_identification: s.alpha(3..11),
            check_digit: s.alpha(11..12),
            addenda_records: s.number_u16(12..16),
            amount: s.number(29..39),
            dfi_account_number: s.alpha(39..74),
            ofac_screening_indicator: s.alpha(76..77),
            secondary_ofac_screening_indicator: s.alpha(77..78),
            addenda_record_indicator: s.number_u8(78..79),
            trace_number: s.alpha(79..94),
            ..IatEntryDetail::default()
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        self.validate_with(&self.validate_opts.clone().unwrap_or_default())
    }
}

impl fmt::Display for IatEntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "6{}{}{}{}{:13}{}{}{:2}{}{}{}{}",
            numeric_field(u64::from(self.transaction_code), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            numeric_field(u64::from(self.addenda_records), 4),
            "",
            numeric_field(self.amount, 10),
            alpha_field(&self.dfi_account_number, 35),
            "",
            alpha_field(&self.ofac_screening_indicator, 1),
            alpha_field(&self.secondary_ofac_screening_indicator, 1),
            numeric_field(u64::from(self.addenda_record_indicator), 1),
            string_field(&self.trace_number, 15),
        )
    }
}
