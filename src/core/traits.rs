//! Core traits shared by the batch flavours
//!
//! Standard, IAT and ADV batches are built and validated the same way but
//! carry different record types. These traits let the control-total engine,
//! the file aggregation and the processing strategies treat them uniformly.

use crate::core::totals::ControlTotals;
use crate::record::{AdvEntryDetail, EntryDetail, IatEntryDetail};
use crate::types::codes::Direction;
use crate::types::{BatchError, ValidateOpts};

/// What the control-total engine needs to know about an entry
pub trait ControlEntry {
    /// First 8 digits of the receiving routing number
    fn rdfi_identification(&self) -> &str;

    /// Amount in cents
    fn amount(&self) -> u64;

    /// Debit or credit, `None` for an unknown transaction code
    fn direction(&self) -> Option<Direction>;

    /// Prenotes are excluded from dollar totals
    fn is_prenote(&self) -> bool;

    /// Attached addenda records
    fn addenda_count(&self) -> usize;
}

impl ControlEntry for EntryDetail {
    fn rdfi_identification(&self) -> &str {
        &self.rdfi_identification
    }

    fn amount(&self) -> u64 {
        self.amount
    }

    fn direction(&self) -> Option<Direction> {
        self.credit_or_debit()
    }

    fn is_prenote(&self) -> bool {
        EntryDetail::is_prenote(self)
    }

    fn addenda_count(&self) -> usize {
        EntryDetail::addenda_count(self)
    }
}

impl ControlEntry for IatEntryDetail {
    fn rdfi_identification(&self) -> &str {
        &self.rdfi_identification
    }

    fn amount(&self) -> u64 {
        self.amount
    }

    fn direction(&self) -> Option<Direction> {
        self.credit_or_debit()
    }

    fn is_prenote(&self) -> bool {
        IatEntryDetail::is_prenote(self)
    }

    fn addenda_count(&self) -> usize {
        IatEntryDetail::addenda_count(self)
    }
}

impl ControlEntry for AdvEntryDetail {
    fn rdfi_identification(&self) -> &str {
        &self.rdfi_identification
    }

    fn amount(&self) -> u64 {
        self.amount
    }

    fn direction(&self) -> Option<Direction> {
        self.credit_or_debit()
    }

    fn is_prenote(&self) -> bool {
        false
    }

    fn addenda_count(&self) -> usize {
        AdvEntryDetail::addenda_count(self)
    }
}

/// Operations every batch flavour provides
///
/// `create` fills derived fields (trace numbers, addenda sequence numbers,
/// control totals) and then validates. `validate_with` only checks.
pub trait AchBatch {
    /// Batch number from the header
    fn batch_number(&self) -> u32;

    /// Standard entry class code from the header
    fn sec(&self) -> &str;

    /// Number of entry detail records
    fn entry_count(&self) -> usize;

    /// Totals tabulated from the entries
    fn totals(&self) -> ControlTotals;

    /// Fill derived fields and validate
    fn create(&mut self) -> Result<(), BatchError>;

    /// Validate with caller overrides, returning the first violation
    fn validate_with(&self, opts: &ValidateOpts) -> Result<(), BatchError>;

    /// Validate with the built-in rules
    fn validate(&self) -> Result<(), BatchError> {
        self.validate_with(&ValidateOpts::default())
    }

    /// Wire lines from batch header to batch control
    fn lines(&self) -> Vec<String>;
}
