//! ACH serialization
//!
//! Writes a [`File`] back to its wire form, one record per line, padded with
//! filler records of 94 `9`s to a whole number of 10-record blocks.

use crate::core::file::{File, BLOCKING_FACTOR};
use crate::record::field::RECORD_LENGTH;
use crate::types::AchError;
use std::io::Write;

/// Filler records needed after `records` physical records
pub fn filler_count(records: usize) -> usize {
    (BLOCKING_FACTOR - records % BLOCKING_FACTOR) % BLOCKING_FACTOR
}

/// Every line of the file, block filler included
pub fn ach_lines(file: &File) -> Vec<String> {
    let mut lines = file.lines();
    let filler = "9".repeat(RECORD_LENGTH);
    let count = filler_count(lines.len());
    lines.extend(std::iter::repeat_n(filler, count));
    lines
}

/// Write the file in NACHA format
///
/// # Arguments
///
/// * `file` - The file to serialize
/// * `output` - Destination; each record is terminated by `\n`
///
/// # Errors
///
/// Returns `AchError::Io` when writing fails.
pub fn write_ach(file: &File, output: &mut dyn Write) -> Result<(), AchError> {
    for line in ach_lines(file) {
        writeln!(output, "{}", line)?;
    }
    output.flush()?;
    Ok(())
}
