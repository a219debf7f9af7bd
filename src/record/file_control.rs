//! File Control record (`9`)

use super::field::{numeric_field, require_width, Slots};
use super::Record;
use crate::types::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last record of a file: totals across every batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileControl {
    pub batch_count: u32,
    /// Number of 10-record blocks, including filler
    pub block_count: u32,
    pub entry_addenda_count: u32,
    /// Sum of batch entry hashes, last 10 digits
    pub entry_hash: u64,
    /// Cents
    pub total_debit_entry_dollar_amount: u64,
    /// Cents
    pub total_credit_entry_dollar_amount: u64,
}

impl Record for FileControl {
    const NAME: &'static str = "FileControl";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return FileControl::default();
        };
        FileControl {
            batch_count: s.number_u32(1..7),
            block_count: s.number_u32(7..13),
            entry_addenda_count: s.number_u32(13..21),
            entry_hash: s.number(21..31),
            total_debit_entry_dollar_amount: s.number(31..43),
            total_credit_entry_dollar_amount: s.number(43..55),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_width("BatchCount", u64::from(self.batch_count), 6)?;
        require_width("BlockCount", u64::from(self.block_count), 6)?;
        require_width("EntryAddendaCount", u64::from(self.entry_addenda_count), 8)?;
        require_width("EntryHash", self.entry_hash, 10)?;
        require_width("TotalDebitEntryDollarAmount", self.total_debit_entry_dollar_amount, 12)?;
        require_width("TotalCreditEntryDollarAmount", self.total_credit_entry_dollar_amount, 12)
    }
}

impl fmt::Display for FileControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "9{}{}{}{}{}{}{:39}",
            numeric_field(u64::from(self.batch_count), 6),
            numeric_field(u64::from(self.block_count), 6),
            numeric_field(u64::from(self.entry_addenda_count), 8),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit_entry_dollar_amount, 12),
            numeric_field(self.total_credit_entry_dollar_amount, 12),
            "",
        )
    }
}
