//! International ACH Transaction batch
//!
//! IAT batches use their own header and entry layouts. Every forward entry
//! carries the mandatory Addenda10 through Addenda16 chain, then up to two
//! Addenda17 and up to five Addenda18 records.

use crate::core::totals::ControlTotals;
use crate::core::traits::AchBatch;
use crate::record::{BatchControl, Category, IatBatchHeader, IatEntryDetail, Record};
use crate::types::codes::{Direction, CREDITS_ONLY, DEBITS_ONLY};
use crate::types::{BatchError, BatchErrorKind, FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};

const SEC: &str = "IAT";
const MAX_ADDENDA17: usize = 2;
const MAX_ADDENDA18: usize = 5;

/// Header, entries and control of one IAT batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IatBatch {
    pub header: IatBatchHeader,
    pub entries: Vec<IatEntryDetail>,
    pub control: BatchControl,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl IatBatch {
    pub fn new(header: IatBatchHeader) -> Self {
        IatBatch {
            header,
            ..IatBatch::default()
        }
    }

    pub fn add_entry(&mut self, entry: IatEntryDetail) {
        self.entries.push(entry);
    }

    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    fn opts(&self) -> ValidateOpts {
        self.validate_opts.clone().unwrap_or_default()
    }

    fn error(&self, field_name: &str, kind: BatchErrorKind) -> BatchError {
        BatchError::new(self.header.batch_number, SEC, field_name, kind)
    }

    fn field(&self, error: FieldError) -> BatchError {
        BatchError::from_field(self.header.batch_number, SEC, error)
    }

    fn sequence_entries(&mut self) {
        let odfi = self.header.odfi_identification.clone();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.set_trace_number(&odfi, u32::try_from(i + 1).unwrap_or(u32::MAX));
            let sequence = entry.trace_sequence();
            let trace = entry.trace_number.clone();
            if let Some(a) = entry.addenda10.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda11.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda12.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda13.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda14.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda15.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda16.as_mut() {
                a.entry_detail_sequence_number = sequence;
            }
            for (j, a) in entry.addenda17.iter_mut().enumerate() {
                a.sequence_number = u32::try_from(j + 1).unwrap_or(u32::MAX);
                a.entry_detail_sequence_number = sequence;
            }
            for (j, a) in entry.addenda18.iter_mut().enumerate() {
                a.sequence_number = u32::try_from(j + 1).unwrap_or(u32::MAX);
                a.entry_detail_sequence_number = sequence;
            }
            if let Some(a) = entry.addenda98.as_mut() {
                a.trace_number = trace.clone();
            }
            if let Some(a) = entry.addenda99.as_mut() {
                a.trace_number = trace;
            }
            entry.addenda_records = u16::try_from(entry.addenda_count()).unwrap_or(u16::MAX);
            entry.addenda_record_indicator = 1;
        }
    }

    fn tabulate_control(&mut self, opts: &ValidateOpts) {
        let control = &mut self.control;
        if control.service_class_code == 0 || !opts.unequal_service_class_code {
            control.service_class_code = self.header.service_class_code;
        }
        control.odfi_identification = self.header.odfi_identification.clone();
        control.batch_number = self.header.batch_number;
        let totals = ControlTotals::tabulate(&self.entries);
        control.entry_addenda_count = totals.entry_addenda_count;
        control.entry_hash = totals.entry_hash;
        control.total_debit_entry_dollar_amount = totals.total_debit;
        control.total_credit_entry_dollar_amount = totals.total_credit;
    }

    /// Addenda legality for the entry's category, plus the 17/18 caps
    fn check_addenda(&self, entry: &IatEntryDetail) -> Result<(), BatchError> {
        let category = entry.category.to_string();
        let not_allowed = |type_code: &str| {
            self.error(
                "Addenda",
                BatchErrorKind::AddendaCategory {
                    category: category.clone(),
                    type_code: type_code.to_string(),
                },
            )
        };
        let required = |type_code: &str| {
            self.error(
                "Addenda",
                BatchErrorKind::AddendaRequired {
                    category: category.clone(),
                    type_code: type_code.to_string(),
                },
            )
        };
        match entry.category {
            Category::Forward => {
                if let Some(missing) = entry.missing_mandatory_addenda() {
                    return Err(required(missing));
                }
                if entry.addenda98.is_some() {
                    return Err(not_allowed("98"));
                }
                if entry.addenda99.is_some() {
                    return Err(not_allowed("99"));
                }
            }
            Category::Return => {
                if entry.addenda98.is_some() {
                    return Err(not_allowed("98"));
                }
                if entry.addenda99.is_none() {
                    return Err(required("99"));
                }
            }
            Category::Noc => {
                if entry.addenda99.is_some() {
                    return Err(not_allowed("99"));
                }
                if entry.addenda98.is_none() {
                    return Err(required("98"));
                }
            }
        }
        if entry.addenda17.len() > MAX_ADDENDA17 {
            return Err(self.error(
                "Addenda17",
                BatchErrorKind::AddendaCount {
                    got: entry.addenda17.len(),
                    max: MAX_ADDENDA17,
                },
            ));
        }
        if entry.addenda18.len() > MAX_ADDENDA18 {
            return Err(self.error(
                "Addenda18",
                BatchErrorKind::AddendaCount {
                    got: entry.addenda18.len(),
                    max: MAX_ADDENDA18,
                },
            ));
        }
        let count = entry.addenda_count();
        if usize::from(entry.addenda_records) != count {
            return Err(self.field(FieldError::new(
                "AddendaRecords",
                entry.addenda_records,
                FieldErrorKind::Mismatch {
                    expected: count.to_string(),
                },
            )));
        }
        Ok(())
    }

    /// Every addenda's entry detail sequence number matches its entry's trace
    fn check_addenda_sequence(&self, entry: &IatEntryDetail) -> Result<(), BatchError> {
        let want = entry.trace_sequence();
        let chain = [
            entry.addenda10.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda11.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda12.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda13.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda14.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda15.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda16.as_ref().map(|a| a.entry_detail_sequence_number),
        ];
        let optional = entry
            .addenda17
            .iter()
            .map(|a| a.entry_detail_sequence_number)
            .chain(entry.addenda18.iter().map(|a| a.entry_detail_sequence_number));
        for got in chain.into_iter().flatten().chain(optional) {
            if got != want {
                return Err(self.error(
                    "EntryDetailSequenceNumber",
                    BatchErrorKind::AddendaSequence { want, got },
                ));
            }
        }
        let numbered = entry
            .addenda17
            .iter()
            .map(|a| a.sequence_number)
            .enumerate()
            .chain(entry.addenda18.iter().map(|a| a.sequence_number).enumerate());
        for (j, got) in numbered {
            let want = u32::try_from(j + 1).unwrap_or(u32::MAX);
            if got != want {
                return Err(self.error(
                    "SequenceNumber",
                    BatchErrorKind::AddendaSequence { want, got },
                ));
            }
        }
        Ok(())
    }

    fn check_control(&self, opts: &ValidateOpts) -> Result<(), BatchError> {
        let header = &self.header;
        let control = &self.control;
        let mismatch = |field: &str, want: String, got: String| {
            Err(self.error(field, BatchErrorKind::HeaderControlEquality { want, got }))
        };
        if !opts.unequal_service_class_code
            && header.service_class_code != control.service_class_code
        {
            return mismatch(
                "ServiceClassCode",
                header.service_class_code.to_string(),
                control.service_class_code.to_string(),
            );
        }
        if header.odfi_identification != control.odfi_identification {
            return mismatch(
                "ODFIIdentification",
                header.odfi_identification.clone(),
                control.odfi_identification.clone(),
            );
        }
        if header.batch_number != control.batch_number {
            return mismatch(
                "BatchNumber",
                header.batch_number.to_string(),
                control.batch_number.to_string(),
            );
        }
        let totals = self.totals();
        let checks = [
            (
                "EntryAddendaCount",
                u64::from(totals.entry_addenda_count),
                u64::from(control.entry_addenda_count),
            ),
            ("EntryHash", totals.entry_hash, control.entry_hash),
            (
                "TotalDebitEntryDollarAmount",
                totals.total_debit,
                control.total_debit_entry_dollar_amount,
            ),
            (
                "TotalCreditEntryDollarAmount",
                totals.total_credit,
                control.total_credit_entry_dollar_amount,
            ),
        ];
        for (field, calculated, recorded) in checks {
            if calculated != recorded {
                return Err(self.error(
                    field,
                    BatchErrorKind::CalculatedControlEquality {
                        calculated: calculated.to_string(),
                        control: recorded.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn check_traces(&self) -> Result<(), BatchError> {
        let odfi = self.header.odfi_identification.as_str();
        let mut previous: Option<&str> = None;
        for entry in &self.entries {
            let trace = entry.trace_number.as_str();
            if previous.is_some_and(|p| trace <= p) {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberAscending {
                        trace: trace.to_string(),
                    },
                ));
            }
            previous = Some(trace);
            if !trace.starts_with(odfi) {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberNotOdfi {
                        trace: trace.to_string(),
                        odfi: odfi.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn check_service_class_direction(&self) -> Result<(), BatchError> {
        let service_class = self.header.service_class_code;
        let wanted = match service_class {
            CREDITS_ONLY => Direction::Credit,
            DEBITS_ONLY => Direction::Debit,
            _ => return Ok(()),
        };
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.credit_or_debit() != Some(wanted))
        {
            return Err(self.error(
                "TransactionCode",
                BatchErrorKind::ServiceClassTranCode {
                    service_class,
                    code: entry.transaction_code,
                },
            ));
        }
        Ok(())
    }
}

impl AchBatch for IatBatch {
    fn batch_number(&self) -> u32 {
        self.header.batch_number
    }

    fn sec(&self) -> &str {
        SEC
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn totals(&self) -> ControlTotals {
        ControlTotals::tabulate(&self.entries)
    }

    fn create(&mut self) -> Result<(), BatchError> {
        let opts = self.opts();
        if self.entries.is_empty() {
            return Err(self.error("Entries", BatchErrorKind::NoEntries));
        }
        self.sequence_entries();
        self.tabulate_control(&opts);
        self.validate_with(&opts)
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<(), BatchError> {
        if opts.skip_all {
            return Ok(());
        }
        self.header.validate().map_err(|e| self.field(e))?;
        if self.entries.is_empty() {
            return Err(self.error("Entries", BatchErrorKind::NoEntries));
        }
        self.control.validate().map_err(|e| self.field(e))?;
        for entry in &self.entries {
            entry
                .validate_with(entry.validation().unwrap_or(opts))
                .map_err(|e| self.field(e))?;
            self.check_addenda(entry)?;
            if entry.is_prenote() && entry.amount != 0 {
                return Err(self.error("Amount", BatchErrorKind::ZeroAmount { got: entry.amount }));
            }
        }
        self.check_control(opts)?;
        self.check_traces()?;
        for entry in &self.entries {
            self.check_addenda_sequence(entry)?;
        }
        self.check_service_class_direction()
    }

    fn validate(&self) -> Result<(), BatchError> {
        self.validate_with(&self.opts())
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.header.to_string()];
        for entry in &self.entries {
            lines.push(entry.to_string());
            let chain = [
                entry.addenda10.as_ref().map(ToString::to_string),
                entry.addenda11.as_ref().map(ToString::to_string),
                entry.addenda12.as_ref().map(ToString::to_string),
                entry.addenda13.as_ref().map(ToString::to_string),
                entry.addenda14.as_ref().map(ToString::to_string),
                entry.addenda15.as_ref().map(ToString::to_string),
                entry.addenda16.as_ref().map(ToString::to_string),
            ];
            lines.extend(chain.into_iter().flatten());
            lines.extend(entry.addenda17.iter().map(ToString::to_string));
            lines.extend(entry.addenda18.iter().map(ToString::to_string));
            if let Some(a) = &entry.addenda98 {
                lines.push(a.to_string());
            }
            if let Some(a) = &entry.addenda99 {
                lines.push(a.to_string());
            }
        }
        lines.push(self.control.to_string());
        lines
    }
}
