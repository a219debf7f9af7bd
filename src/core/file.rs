//! File aggregation
//!
//! A [`File`] is the root of the tree: an optional header, the batches in
//! file order and an optional control record. File control totals are the
//! batch totals summed, plus a batch count and a block count.

use crate::core::adv_batch::AdvBatch;
use crate::core::batch::Batch;
use crate::core::iat_batch::IatBatch;
use crate::core::totals::ControlTotals;
use crate::core::traits::AchBatch;
use crate::record::{AdvFileControl, FileControl, FileHeader, Record};
use crate::types::{AchError, FileError, ValidateOpts};
use serde::{Deserialize, Serialize};

/// Records per block
pub const BLOCKING_FACTOR: usize = 10;

/// One batch of any flavour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FileBatch {
    Standard(Batch),
    Iat(IatBatch),
    Adv(AdvBatch),
}

impl FileBatch {
    pub fn as_batch(&self) -> &dyn AchBatch {
        match self {
            FileBatch::Standard(b) => b,
            FileBatch::Iat(b) => b,
            FileBatch::Adv(b) => b,
        }
    }

    pub fn as_batch_mut(&mut self) -> &mut dyn AchBatch {
        match self {
            FileBatch::Standard(b) => b,
            FileBatch::Iat(b) => b,
            FileBatch::Adv(b) => b,
        }
    }

    pub fn is_adv(&self) -> bool {
        matches!(self, FileBatch::Adv(_))
    }

    /// Physical records from batch header to batch control
    pub fn record_count(&self) -> usize {
        2 + self.as_batch().totals().entry_addenda_count as usize
    }
}

impl From<Batch> for FileBatch {
    fn from(batch: Batch) -> Self {
        FileBatch::Standard(batch)
    }
}

impl From<IatBatch> for FileBatch {
    fn from(batch: IatBatch) -> Self {
        FileBatch::Iat(batch)
    }
}

impl From<AdvBatch> for FileBatch {
    fn from(batch: AdvBatch) -> Self {
        FileBatch::Adv(batch)
    }
}

/// A complete ACH file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub header: Option<FileHeader>,
    pub batches: Vec<FileBatch>,
    /// Control of a standard file
    pub control: Option<FileControl>,
    /// Control of a file made only of ADV batches
    pub adv_control: Option<AdvFileControl>,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

/// Totals a file control must carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FileTotals {
    batch_count: u32,
    block_count: u32,
    totals: ControlTotals,
}

impl File {
    pub fn new(header: FileHeader) -> Self {
        File {
            header: Some(header),
            ..File::default()
        }
    }

    pub fn add_batch(&mut self, batch: impl Into<FileBatch>) {
        self.batches.push(batch.into());
    }

    /// Install file-level overrides, e.g. tolerating a missing header
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    pub fn validation(&self) -> ValidateOpts {
        self.validate_opts.clone().unwrap_or_default()
    }

    /// Whether every batch is an ADV batch
    pub fn is_adv(&self) -> bool {
        !self.batches.is_empty() && self.batches.iter().all(FileBatch::is_adv)
    }

    pub fn entry_count(&self) -> usize {
        self.batches.iter().map(|b| b.as_batch().entry_count()).sum()
    }

    /// Batch totals summed across the file
    pub fn totals(&self) -> ControlTotals {
        self.batches
            .iter()
            .fold(ControlTotals::default(), |mut total, batch| {
                total.accumulate(&batch.as_batch().totals());
                total
            })
    }

    /// Physical records, header and control included, without block filler
    pub fn record_count(&self) -> usize {
        2 + self.batches.iter().map(FileBatch::record_count).sum::<usize>()
    }

    /// Number of 10-record blocks needed to hold the file
    pub fn block_count(&self) -> u32 {
        u32::try_from(self.record_count().div_ceil(BLOCKING_FACTOR)).unwrap_or(u32::MAX)
    }

    fn calculated(&self) -> FileTotals {
        FileTotals {
            batch_count: u32::try_from(self.batches.len()).unwrap_or(u32::MAX),
            block_count: self.block_count(),
            totals: self.totals(),
        }
    }

    /// Create every batch, then build the file control from their totals
    ///
    /// # Errors
    ///
    /// Returns the first batch error, or a file error when the batches cannot
    /// share one file.
    pub fn create(&mut self) -> Result<(), AchError> {
        let opts = self.validation();
        if !opts.skip_all {
            if self.header.is_none() && !opts.allow_missing_file_header {
                return Err(FileError::FileHeader.into());
            }
            self.check_batch_set(&opts)?;
        }
        for batch in &mut self.batches {
            batch.as_batch_mut().create()?;
        }
        let calculated = self.calculated();
        if self.is_adv() {
            self.control = None;
            self.adv_control = Some(AdvFileControl {
                batch_count: calculated.batch_count,
                block_count: calculated.block_count,
                entry_addenda_count: calculated.totals.entry_addenda_count,
                entry_hash: calculated.totals.entry_hash,
                total_debit_entry_dollar_amount: calculated.totals.total_debit,
                total_credit_entry_dollar_amount: calculated.totals.total_credit,
            });
        } else {
            self.adv_control = None;
            self.control = Some(FileControl {
                batch_count: calculated.batch_count,
                block_count: calculated.block_count,
                entry_addenda_count: calculated.totals.entry_addenda_count,
                entry_hash: calculated.totals.entry_hash,
                total_debit_entry_dollar_amount: calculated.totals.total_debit,
                total_credit_entry_dollar_amount: calculated.totals.total_credit,
            });
        }
        self.validate_with(&opts)
    }

    pub fn validate(&self) -> Result<(), AchError> {
        self.validate_with(&self.validation())
    }

    /// Validate header, every batch and the file control
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<(), AchError> {
        if opts.skip_all {
            return Ok(());
        }
        match &self.header {
            Some(header) => header.validate_with(opts)?,
            None if opts.allow_missing_file_header => {}
            None => return Err(FileError::FileHeader.into()),
        }
        self.check_batch_set(opts)?;
        for batch in &self.batches {
            batch.as_batch().validate_with(opts)?;
        }
        self.validate_control(opts)
    }

    /// Batch presence, ordering and ADV homogeneity
    pub fn check_batch_set(&self, opts: &ValidateOpts) -> Result<(), FileError> {
        if self.batches.is_empty() && !opts.allow_zero_batches {
            return Err(FileError::NoBatches);
        }
        let adv = self.batches.iter().filter(|b| b.is_adv()).count();
        if adv > 0 && adv != self.batches.len() {
            return Err(FileError::AdvMixed);
        }
        let mut previous: Option<u32> = None;
        for batch in &self.batches {
            let got = batch.as_batch().batch_number();
            if let Some(previous) = previous.filter(|p| got <= *p) {
                return Err(FileError::BatchNumberAscending { previous, got });
            }
            previous = Some(got);
        }
        Ok(())
    }

    /// Compare the file control record against totals recomputed from the batches
    pub fn validate_control(&self, opts: &ValidateOpts) -> Result<(), AchError> {
        let recorded = match (&self.control, &self.adv_control) {
            (Some(control), _) => {
                control.validate()?;
                FileTotals {
                    batch_count: control.batch_count,
                    block_count: control.block_count,
                    totals: ControlTotals {
                        entry_addenda_count: control.entry_addenda_count,
                        entry_hash: control.entry_hash,
                        total_debit: control.total_debit_entry_dollar_amount,
                        total_credit: control.total_credit_entry_dollar_amount,
                    },
                }
            }
            (None, Some(control)) => {
                control.validate()?;
                FileTotals {
                    batch_count: control.batch_count,
                    block_count: control.block_count,
                    totals: ControlTotals {
                        entry_addenda_count: control.entry_addenda_count,
                        entry_hash: control.entry_hash,
                        total_debit: control.total_debit_entry_dollar_amount,
                        total_credit: control.total_credit_entry_dollar_amount,
                    },
                }
            }
            (None, None) if opts.allow_missing_file_control => return Ok(()),
            (None, None) => return Err(FileError::FileControl.into()),
        };
        let calculated = self.calculated();
        let checks = [
            (
                "BatchCount",
                u64::from(calculated.batch_count),
                u64::from(recorded.batch_count),
            ),
            (
                "BlockCount",
                u64::from(calculated.block_count),
                u64::from(recorded.block_count),
            ),
            (
                "EntryAddendaCount",
                u64::from(calculated.totals.entry_addenda_count),
                u64::from(recorded.totals.entry_addenda_count),
            ),
            (
                "EntryHash",
                calculated.totals.entry_hash,
                recorded.totals.entry_hash,
            ),
            (
                "TotalDebitEntryDollarAmount",
                calculated.totals.total_debit,
                recorded.totals.total_debit,
            ),
            (
                "TotalCreditEntryDollarAmount",
                calculated.totals.total_credit,
                recorded.totals.total_credit,
            ),
        ];
        for (field_name, calculated, control) in checks {
            if calculated != control {
                return Err(FileError::Calculated {
                    field_name: field_name.to_string(),
                    calculated: calculated.to_string(),
                    control: control.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Wire lines in file order, without block filler
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.record_count());
        if let Some(header) = &self.header {
            lines.push(header.to_string());
        }
        for batch in &self.batches {
            lines.extend(batch.as_batch().lines());
        }
        if let Some(control) = &self.control {
            lines.push(control.to_string());
        } else if let Some(control) = &self.adv_control {
            lines.push(control.to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adv_batch::tests::adv_batch;
    use crate::record::{Addenda05, BatchHeader, EntryDetail};
    use crate::types::SecCode;
    use rstest::rstest;

    fn file_header() -> FileHeader {
        FileHeader {
            immediate_destination: "231380104".into(),
            immediate_origin: "121042882".into(),
            file_creation_date: "230630".into(),
            file_creation_time: "1200".into(),
            immediate_destination_name: "Citadel".into(),
            immediate_origin_name: "Wells Fargo".into(),
            ..FileHeader::new()
        }
    }

    fn ppd_batch(batch_number: u32, entries: usize) -> Batch {
        let mut header = BatchHeader::new(200, SecCode::Ppd);
        header.company_name = "Name on Account".into();
        header.company_identification = "231380104".into();
        header.company_entry_description = "PAYROLL".into();
        header.odfi_identification = "12104288".into();
        header.batch_number = batch_number;
        let mut batch = Batch::new(header);
        for i in 0..entries {
            let mut entry = EntryDetail::new(if i % 2 == 0 { 22 } else { 27 });
            entry.set_rdfi("231380104");
            entry.dfi_account_number = "123456789".into();
            entry.amount = 1000;
            entry.individual_name = "Receiver".into();
            entry.add_addenda05(Addenda05::new("Invoice"));
            batch.add_entry(entry);
        }
        batch
    }

    #[test]
    fn test_create_builds_file_control() {
        let mut file = File::new(file_header());
        file.add_batch(ppd_batch(1, 2));
        file.add_batch(ppd_batch(2, 1));
        file.create().unwrap();
        let control = file.control.as_ref().unwrap();
        assert_eq!(control.batch_count, 2);
        assert_eq!(control.entry_addenda_count, 6);
        assert_eq!(control.entry_hash, 3 * 23138010);
        assert_eq!(control.total_credit_entry_dollar_amount, 2000);
        assert_eq!(control.total_debit_entry_dollar_amount, 1000);
        // 1 header + 2 * (2 + count) + 1 control = 12 records
        assert_eq!(file.record_count(), 12);
        assert_eq!(control.block_count, 2);
        assert_eq!(file.lines().len(), 12);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 1)]
    #[case(4, 2)]
    fn test_block_count(#[case] entries: usize, #[case] blocks: u32) {
        let mut file = File::new(file_header());
        file.add_batch(ppd_batch(1, entries));
        file.create().unwrap();
        assert_eq!(file.block_count(), blocks);
    }

    #[test]
    fn test_tampered_file_control() {
        let mut file = File::new(file_header());
        file.add_batch(ppd_batch(1, 1));
        file.create().unwrap();
        if let Some(control) = file.control.as_mut() {
            control.entry_hash += 1;
        }
        let err = file.validate().unwrap_err();
        assert!(matches!(
            err.file_error(),
            Some(FileError::Calculated { field_name, .. }) if field_name == "EntryHash"
        ));
    }

    #[test]
    fn test_missing_header_and_control() {
        let mut file = File::default();
        file.add_batch(ppd_batch(1, 1));
        assert_eq!(file.create().unwrap_err().file_error(), Some(&FileError::FileHeader));
        file.set_validation(ValidateOpts {
            allow_missing_file_header: true,
            ..ValidateOpts::default()
        });
        file.create().unwrap();
        file.control = None;
        assert_eq!(file.validate().unwrap_err().file_error(), Some(&FileError::FileControl));
    }

    #[test]
    fn test_zero_batches() {
        let mut file = File::new(file_header());
        assert_eq!(file.create().unwrap_err().file_error(), Some(&FileError::NoBatches));
        file.set_validation(ValidateOpts {
            allow_zero_batches: true,
            ..ValidateOpts::default()
        });
        file.create().unwrap();
        assert_eq!(file.block_count(), 1);
    }

    #[test]
    fn test_batch_numbers_ascend() {
        let mut file = File::new(file_header());
        file.add_batch(ppd_batch(2, 1));
        file.add_batch(ppd_batch(2, 1));
        assert_eq!(
            file.create().unwrap_err().file_error(),
            Some(&FileError::BatchNumberAscending { previous: 2, got: 2 })
        );
    }

    #[test]
    fn test_adv_file_uses_adv_control() {
        let mut file = File::new(file_header());
        file.add_batch(adv_batch());
        file.create().unwrap();
        assert!(file.control.is_none());
        let control = file.adv_control.as_ref().unwrap();
        assert_eq!(control.total_credit_entry_dollar_amount, 50000);
        assert_eq!(control.total_debit_entry_dollar_amount, 1250);
        file.add_batch(ppd_batch(2, 1));
        assert_eq!(file.create().unwrap_err().file_error(), Some(&FileError::AdvMixed));
    }
}
