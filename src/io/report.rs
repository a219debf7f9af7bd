//! Entry reports
//!
//! Flattens a [`File`] into one row per entry for CSV output, and writes the
//! whole tree as JSON. Amounts are stored in cents and rendered as dollars.

use crate::core::file::{File, FileBatch};
use crate::types::{AchError, Direction};
use rust_decimal::Decimal;
use std::io::Write;

/// One entry of the file as reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub batch: u32,
    pub sec: String,
    pub trace: String,
    pub transaction_code: u8,
    pub direction: Option<Direction>,
    pub amount: Decimal,
    pub name: String,
}

/// Convert an amount in cents to dollars
pub fn dollars(cents: u64) -> Decimal {
    Decimal::from(cents) / Decimal::ONE_HUNDRED
}

/// Flatten every entry of every batch, in file order
pub fn entry_rows(file: &File) -> Vec<EntryRow> {
    let mut rows = Vec::with_capacity(file.entry_count());
    for batch in &file.batches {
        let number = batch.as_batch().batch_number();
        let sec = batch.as_batch().sec().to_string();
        match batch {
            FileBatch::Standard(b) => rows.extend(b.entries.iter().map(|e| EntryRow {
                batch: number,
                sec: sec.clone(),
                trace: e.trace_number.clone(),
                transaction_code: e.transaction_code,
                direction: e.credit_or_debit(),
                amount: dollars(e.amount),
                name: e.individual_name.clone(),
            })),
            FileBatch::Iat(b) => rows.extend(b.entries.iter().map(|e| EntryRow {
                batch: number,
                sec: sec.clone(),
                trace: e.trace_number.clone(),
                transaction_code: e.transaction_code,
                direction: e.credit_or_debit(),
                amount: dollars(e.amount),
                name: e
                    .addenda10
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
            })),
            FileBatch::Adv(b) => rows.extend(b.entries.iter().map(|e| EntryRow {
                batch: number,
                sec: sec.clone(),
                trace: e.sequence_number.to_string(),
                transaction_code: e.transaction_code,
                direction: e.credit_or_debit(),
                amount: dollars(e.amount),
                name: e.individual_name.clone(),
            })),
        }
    }
    rows
}

/// Write one CSV row per entry
///
/// Columns: batch, sec, trace, transaction_code, direction, amount, name.
///
/// # Errors
///
/// Returns `AchError::Io` if a write fails.
pub fn write_entries_csv(file: &File, output: &mut dyn Write) -> Result<(), AchError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);
    let to_io = |e: csv::Error| AchError::Io {
        message: format!("Failed to write CSV: {}", e),
    };

    writer
        .write_record([
            "batch",
            "sec",
            "trace",
            "transaction_code",
            "direction",
            "amount",
            "name",
        ])
        .map_err(to_io)?;

    for row in entry_rows(file) {
        writer
            .write_record(&[
                row.batch.to_string(),
                row.sec,
                row.trace,
                row.transaction_code.to_string(),
                row.direction.map(|d| d.letter()).unwrap_or("").to_string(),
                format!("{:.2}", row.amount),
                row.name,
            ])
            .map_err(to_io)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the file tree as pretty JSON
pub fn write_json(file: &File, output: &mut dyn Write) -> Result<(), AchError> {
    serde_json::to_writer_pretty(&mut *output, file).map_err(|e| AchError::Io {
        message: format!("Failed to write JSON: {}", e),
    })?;
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adv_batch::tests::adv_batch;
    use crate::core::AchBatch;
    use crate::io::reader::read_str;
    use crate::types::ValidateOpts;
    use rstest::rstest;

    const FILE: [&str; 6] = [
        "101 231380104 1210428822306301200A094101Citadel                Wells Fargo                    ",
        "5220Name on Account                     231380104 PPDPAYROLL         230630   1121042880000001",
        "622231380104123456789        0000025000               Receiver Account Name   1121042880000001",
        "705Vacation pay                                                                    00010000001",
        "82200000020023138010000000000000000000025000231380104                          121042880000001",
        "9000001000001000000020023138010000000000000000000025000                                       ",
    ];

    fn file() -> File {
        read_str(&FILE.join("\n"), ValidateOpts::default()).file
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(1, "0.01")]
    #[case(25000, "250.00")]
    #[case(99999999, "999999.99")]
    fn test_dollars(#[case] cents: u64, #[case] expected: &str) {
        assert_eq!(format!("{:.2}", dollars(cents)), expected);
    }

    #[test]
    fn test_entries_csv() {
        let mut output = Vec::new();
        write_entries_csv(&file(), &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        assert_eq!(
            csv,
            "batch,sec,trace,transaction_code,direction,amount,name\n\
             1,PPD,121042880000001,22,C,250.00,Receiver Account Name\n"
        );
    }

    #[test]
    fn test_adv_rows_use_sequence_numbers() {
        let mut batch = adv_batch();
        batch.create().unwrap();
        let mut file = File::default();
        file.add_batch(batch);
        let rows = entry_rows(&file);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].trace, "2");
        assert_eq!(rows[1].direction, Some(Direction::Debit));
        assert_eq!(rows[0].amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_json_round_trip() {
        let mut output = Vec::new();
        let file = file();
        write_json(&file, &mut output).unwrap();
        let parsed: File = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.lines(), file.lines());
    }
}
