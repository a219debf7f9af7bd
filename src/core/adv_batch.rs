//! Automated accounting advice batch
//!
//! ADV batches use service class 280, ADV entry and control layouts, and
//! number entries by a 4-digit sequence instead of trace numbers.

use crate::core::totals::ControlTotals;
use crate::core::traits::AchBatch;
use crate::record::{AdvBatchControl, AdvEntryDetail, BatchHeader, Category, Record};
use crate::types::codes::AUTOMATED_ACCOUNTING_ADVICES;
use crate::types::{
    BatchError, BatchErrorKind, FieldError, FieldErrorKind, SecCode, ValidateOpts,
};
use serde::{Deserialize, Serialize};

/// Header, advices and control of one ADV batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvBatch {
    pub header: BatchHeader,
    pub entries: Vec<AdvEntryDetail>,
    pub control: AdvBatchControl,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl AdvBatch {
    pub fn new(header: BatchHeader) -> Self {
        AdvBatch {
            header,
            ..AdvBatch::default()
        }
    }

    pub fn add_entry(&mut self, entry: AdvEntryDetail) {
        self.entries.push(entry);
    }

    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    fn opts(&self) -> ValidateOpts {
        self.validate_opts.clone().unwrap_or_default()
    }

    fn error(&self, field_name: &str, kind: BatchErrorKind) -> BatchError {
        BatchError::new(
            self.header.batch_number,
            &self.header.standard_entry_class_code,
            field_name,
            kind,
        )
    }

    fn field(&self, error: FieldError) -> BatchError {
        BatchError::from_field(
            self.header.batch_number,
            &self.header.standard_entry_class_code,
            error,
        )
    }

    fn check_header(&self) -> Result<(), BatchError> {
        self.header.validate().map_err(|e| self.field(e))?;
        if self.header.service_class_code != AUTOMATED_ACCOUNTING_ADVICES {
            return Err(self.field(FieldError::new(
                "ServiceClassCode",
                self.header.service_class_code,
                FieldErrorKind::ServiceClass,
            )));
        }
        if self.header.sec_code() != Some(SecCode::Adv) {
            return Err(self.field(FieldError::new(
                "StandardEntryClassCode",
                &self.header.standard_entry_class_code,
                FieldErrorKind::SecCode,
            )));
        }
        Ok(())
    }

    /// Forward advices carry no addenda; returned advices carry exactly one Addenda99
    fn check_entry(&self, entry: &AdvEntryDetail) -> Result<(), BatchError> {
        let category = entry.category.to_string();
        match entry.category {
            Category::Forward if entry.addenda99.is_some() => Err(self.error(
                "Addenda",
                BatchErrorKind::AddendaCategory {
                    category,
                    type_code: "99".to_string(),
                },
            )),
            Category::Return if entry.addenda99.is_none() => Err(self.error(
                "Addenda",
                BatchErrorKind::AddendaRequired {
                    category,
                    type_code: "99".to_string(),
                },
            )),
            Category::Noc => Err(self.error("Category", BatchErrorKind::Category { category })),
            _ => {
                let count = entry.addenda_count();
                if (count > 0) != (entry.addenda_record_indicator == 1) {
                    return Err(self.error(
                        "AddendaRecordIndicator",
                        BatchErrorKind::AddendaIndicator {
                            indicator: entry.addenda_record_indicator,
                            count,
                        },
                    ));
                }
                Ok(())
            }
        }
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

    fn check_sequence_numbers(&self) -> Result<(), BatchError> {
        let mut previous = 0;
        for entry in &self.entries {
            if entry.sequence_number <= previous {
                return Err(self.error(
                    "SequenceNumber",
                    BatchErrorKind::TraceNumberAscending {
                        trace: entry.sequence_number.to_string(),
                    },
                ));
            }
            previous = entry.sequence_number;
        }
        Ok(())
    }
}

impl AchBatch for AdvBatch {
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
            return Err(self.error("Entries", BatchErrorKind::NoEntries));
        }
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.sequence_number = u32::try_from(i + 1).unwrap_or(u32::MAX);
            entry.addenda_record_indicator = u8::from(entry.addenda_count() > 0);
        }
        let totals = self.totals();
        let control = &mut self.control;
        if control.service_class_code == 0 || !opts.unequal_service_class_code {
            control.service_class_code = self.header.service_class_code;
        }
        control.odfi_identification = self.header.odfi_identification.clone();
        control.batch_number = self.header.batch_number;
        control.entry_addenda_count = totals.entry_addenda_count;
        control.entry_hash = totals.entry_hash;
        control.total_debit_entry_dollar_amount = totals.total_debit;
        control.total_credit_entry_dollar_amount = totals.total_credit;
        self.validate_with(&opts)
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<(), BatchError> {
        if opts.skip_all {
            return Ok(());
        }
        self.check_header()?;
        if self.entries.is_empty() {
            return Err(self.error("Entries", BatchErrorKind::NoEntries));
        }
        self.control.validate().map_err(|e| self.field(e))?;
        for entry in &self.entries {
            entry
                .validate_with(entry.validation().unwrap_or(opts))
                .map_err(|e| self.field(e))?;
            self.check_entry(entry)?;
        }
        self.check_control(opts)?;
        self.check_sequence_numbers()
    }

    fn validate(&self) -> Result<(), BatchError> {
        self.validate_with(&self.opts())
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.header.to_string()];
        for entry in &self.entries {
            lines.push(entry.to_string());
            if let Some(addenda) = &entry.addenda99 {
                lines.push(addenda.to_string());
            }
        }
        lines.push(self.control.to_string());
        lines
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn adv_batch() -> AdvBatch {
        let mut header = BatchHeader::new(AUTOMATED_ACCOUNTING_ADVICES, SecCode::Adv);
        header.company_name = "Company Name".into();
        header.company_identification = "121042882".into();
        header.company_entry_description = "Accounting".into();
        header.odfi_identification = "12104288".into();
        let mut batch = AdvBatch::new(header);
        for (code, amount) in [(81, 50000), (82, 1250)] {
            let mut entry = AdvEntryDetail::new(code);
            entry.set_rdfi("231380104");
            entry.dfi_account_number = "744-5678-99".into();
            entry.amount = amount;
            entry.advice_routing_number = "121042882".into();
            entry.file_identification = "11111".into();
            entry.individual_name = "Name on Account".into();
            entry.ach_operator_routing_number = "12104288".into();
            entry.julian_day = 180;
            batch.add_entry(entry);
        }
        batch
    }

    #[test]
    fn test_create_adv_batch() {
        let mut batch = adv_batch();
        batch.create().unwrap();
        assert_eq!(batch.control.service_class_code, 280);
        assert_eq!(batch.control.entry_addenda_count, 2);
        assert_eq!(batch.control.total_credit_entry_dollar_amount, 50000);
        assert_eq!(batch.control.total_debit_entry_dollar_amount, 1250);
        assert_eq!(batch.entries[1].sequence_number, 2);
        let lines = batch.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(AdvBatchControl::parse(&lines[3]), batch.control);
    }

    #[test]
    fn test_adv_requires_service_class_280() {
        let mut batch = adv_batch();
        batch.header.service_class_code = 200;
        let err = batch.create().unwrap_err();
        assert_eq!(err.field_name, "ServiceClassCode");
    }

    #[test]
    fn test_adv_sequence_numbers_ascend() {
        let mut batch = adv_batch();
        batch.create().unwrap();
        batch.entries[1].sequence_number = 1;
        assert!(matches!(
            batch.validate().unwrap_err().kind,
            BatchErrorKind::TraceNumberAscending { .. }
        ));
    }
}
