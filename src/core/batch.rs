//! Standard batch
//!
//! A [`Batch`] owns one header, its entries and one control record. The
//! control-total engine fills the control during [`AchBatch::create`]; the
//! rule row selected by the header's SEC code is applied during validation.

use crate::core::rules::{Scope, SecRules};
use crate::core::totals::ControlTotals;
use crate::core::traits::AchBatch;
use crate::record::entry_detail::trace_sequence;
use crate::record::{BatchControl, BatchHeader, EntryDetail, Record};
use crate::types::codes::{Direction, CREDITS_ONLY, DEBITS_ONLY};
use crate::types::{BatchError, BatchErrorKind, SecCode, ValidateOpts};
use serde::{Deserialize, Serialize};

/// Header, entries and control of one standard (non-IAT, non-ADV) batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub header: BatchHeader,
    /// Insertion order is trace number order
    pub entries: Vec<EntryDetail>,
    pub control: BatchControl,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl Batch {
    /// Create an empty batch for the given header
    ///
    /// # Arguments
    ///
    /// * `header` - The batch header; its SEC code selects the rule row
    ///
    /// # Returns
    ///
    /// A batch with no entries and a zero-value control record
    pub fn new(header: BatchHeader) -> Self {
        Batch {
            header,
            ..Batch::default()
        }
    }

    pub fn add_entry(&mut self, entry: EntryDetail) {
        self.entries.push(entry);
    }

    /// Install validation overrides used by `create` and `validate`
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    /// Rule row for the header's SEC code
    ///
    /// `None` for IAT and ADV, which are built with [`IatBatch`](crate::core::IatBatch)
    /// and [`AdvBatch`](crate::core::AdvBatch).
    pub fn rules(&self) -> Option<&'static SecRules> {
        self.header.sec_code().and_then(SecRules::for_sec)
    }

    fn opts(&self) -> ValidateOpts {
        self.validate_opts.clone().unwrap_or_default()
    }

    fn scope(&self) -> Scope<'_> {
        Scope::of(&self.header)
    }

    /// Assign trace numbers and addenda sequence numbers in entry order
    fn sequence_entries(&mut self) {
        let odfi = self.header.odfi_identification.clone();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let sequence = u32::try_from(i + 1).unwrap_or(u32::MAX);
            entry.set_trace_number(&odfi, sequence);
            let trace = entry.trace_number.clone();
            let entry_sequence = trace_sequence(&trace);
            if let Some(addenda) = entry.addenda02.as_mut() {
                addenda.trace_number = trace.clone();
            }
            for (j, addenda) in entry.addenda05.iter_mut().enumerate() {
                addenda.sequence_number = u32::try_from(j + 1).unwrap_or(u32::MAX);
                addenda.entry_detail_sequence_number = entry_sequence;
            }
            if let Some(addenda) = entry.addenda98.as_mut() {
                addenda.trace_number = trace.clone();
            }
            if let Some(addenda) = entry.addenda99.as_mut() {
                addenda.trace_number = trace;
            }
            entry.addenda_record_indicator = u8::from(entry.addenda_count() > 0);
        }
    }

    /// Write the header identity and tabulated totals into the control record
    fn tabulate_control(&mut self, opts: &ValidateOpts) {
        let control = &mut self.control;
        if control.service_class_code == 0 || !opts.unequal_service_class_code {
            control.service_class_code = self.header.service_class_code;
        }
        control.company_identification = self.header.company_identification.clone();
        control.odfi_identification = self.header.odfi_identification.clone();
        control.batch_number = self.header.batch_number;
        let totals = ControlTotals::tabulate(&self.entries);
        control.entry_addenda_count = totals.entry_addenda_count;
        control.entry_hash = totals.entry_hash;
        control.total_debit_entry_dollar_amount = totals.total_debit;
        control.total_credit_entry_dollar_amount = totals.total_credit;
    }

    fn check_header_control(&self, opts: &ValidateOpts) -> Result<(), BatchError> {
        let scope = self.scope();
        let header = &self.header;
        let control = &self.control;
        let mismatch = |field: &str, want: String, got: String| {
            Err(scope.error(field, BatchErrorKind::HeaderControlEquality { want, got }))
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
        if header.company_identification != control.company_identification {
            return mismatch(
                "CompanyIdentification",
                header.company_identification.clone(),
                control.company_identification.clone(),
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
        Ok(())
    }

    fn check_totals(&self) -> Result<(), BatchError> {
        let totals = self.totals();
        let control = &self.control;
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
                return Err(self.scope().error(
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

    /// Trace numbers ascend, carry the ODFI prefix, and addenda agree with their entry
    fn check_sequencing(&self) -> Result<(), BatchError> {
        let scope = self.scope();
        let odfi = self.header.odfi_identification.as_str();
        let mut previous: Option<&str> = None;
        for entry in &self.entries {
            let trace = entry.trace_number.as_str();
            if previous.is_some_and(|p| trace <= p) {
                return Err(scope.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberAscending {
                        trace: trace.to_string(),
                    },
                ));
            }
            previous = Some(trace);
            if !trace.starts_with(odfi) {
                return Err(scope.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberNotOdfi {
                        trace: trace.to_string(),
                        odfi: odfi.to_string(),
                    },
                ));
            }
            check_addenda_sequencing(scope, entry)?;
        }
        Ok(())
    }

    /// 220 batches carry only credits and 225 batches only debits
    fn check_service_class_direction(&self) -> Result<(), BatchError> {
        let service_class = self.header.service_class_code;
        let wanted = match service_class {
            CREDITS_ONLY => Direction::Credit,
            DEBITS_ONLY => Direction::Debit,
            _ => return Ok(()),
        };
        match self
            .entries
            .iter()
            .find(|e| e.credit_or_debit() != Some(wanted))
        {
            Some(entry) => Err(self.scope().error(
                "TransactionCode",
                BatchErrorKind::ServiceClassTranCode {
                    service_class,
                    code: entry.transaction_code,
                },
            )),
            None => Ok(()),
        }
    }
}

fn check_addenda_sequencing(scope: Scope<'_>, entry: &EntryDetail) -> Result<(), BatchError> {
    let trace = entry.trace_number.as_str();
    let attached_traces = [
        entry.addenda02.as_ref().map(|a| a.trace_number.as_str()),
        entry.addenda98.as_ref().map(|a| a.trace_number.as_str()),
        entry.addenda99.as_ref().map(|a| a.trace_number.as_str()),
    ];
    for addenda in attached_traces.into_iter().flatten() {
        if addenda != trace {
            return Err(scope.error(
                "TraceNumber",
                BatchErrorKind::AddendaTraceNumber {
                    addenda: addenda.to_string(),
                    entry: trace.to_string(),
                },
            ));
        }
    }
    let entry_sequence = entry.trace_sequence();
    for (j, addenda) in entry.addenda05.iter().enumerate() {
        let want = u32::try_from(j + 1).unwrap_or(u32::MAX);
        if addenda.sequence_number != want {
            return Err(scope.error(
                "SequenceNumber",
                BatchErrorKind::AddendaSequence {
                    want,
                    got: addenda.sequence_number,
                },
            ));
        }
        if addenda.entry_detail_sequence_number != entry_sequence {
            return Err(scope.error(
                "EntryDetailSequenceNumber",
                BatchErrorKind::AddendaSequence {
                    want: entry_sequence,
                    got: addenda.entry_detail_sequence_number,
                },
            ));
        }
    }
    let count = entry.addenda_count();
    if (count > 0) != (entry.addenda_record_indicator == 1) {
        return Err(scope.error(
            "AddendaRecordIndicator",
            BatchErrorKind::AddendaIndicator {
                indicator: entry.addenda_record_indicator,
                count,
            },
        ));
    }
    Ok(())
}

impl AchBatch for Batch {
    fn batch_number(&self) -> u32 {
        self.header.batch_number
    }

    fn sec(&self) -> &str {
        &self.header.standard_entry_class_code
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
            return Err(self.scope().error("Entries", BatchErrorKind::NoEntries));
        }
        self.sequence_entries();
        self.tabulate_control(&opts);
        self.validate_with(&opts)
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<(), BatchError> {
        if opts.skip_all {
            return Ok(());
        }
        let scope = self.scope();
        self.header.validate().map_err(|e| scope.field(e))?;
        let Some(rules) = self.rules() else {
            let batch_type = match self.header.sec_code() {
                Some(SecCode::Adv) => "AdvBatch",
                _ => "IatBatch",
            };
            return Err(scope.error(
                "StandardEntryClassCode",
                BatchErrorKind::UnsupportedSec {
                    sec: self.header.standard_entry_class_code.clone(),
                    batch_type: batch_type.to_string(),
                },
            ));
        };
        if self.entries.is_empty() {
            return Err(scope.error("Entries", BatchErrorKind::NoEntries));
        }
        self.control.validate().map_err(|e| scope.field(e))?;
        for entry in &self.entries {
            entry
                .validate_with(entry.validation().unwrap_or(opts))
                .map_err(|e| scope.field(e))?;
        }
        rules.check_header(&self.header)?;
        for entry in &self.entries {
            rules.check_entry(scope, entry)?;
        }
        self.check_header_control(opts)?;
        self.check_totals()?;
        self.check_sequencing()?;
        self.check_service_class_direction()
    }

    fn validate(&self) -> Result<(), BatchError> {
        self.validate_with(&self.opts())
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2 + self.entries.len() * 2);
        lines.push(self.header.to_string());
        for entry in &self.entries {
            lines.push(entry.to_string());
            if let Some(addenda) = &entry.addenda02 {
                lines.push(addenda.to_string());
            }
            lines.extend(entry.addenda05.iter().map(|a| a.to_string()));
            if let Some(addenda) = &entry.addenda98 {
                lines.push(addenda.to_string());
            }
            if let Some(addenda) = &entry.addenda99 {
                lines.push(addenda.to_string());
            }
        }
        lines.push(self.control.to_string());
        lines
    }
}
