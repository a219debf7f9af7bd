//! I/O module
//!
//! Reads ACH files into the record tree and writes it back out.
//!
//! # Components
//!
//! - `reader` - Assembly state machine and synchronous reader
//! - `async_reader` - Asynchronous reader with batch reading interface
//! - `writer` - NACHA serialization with block filler
//! - `report` - Per-entry CSV rows and JSON output

pub mod async_reader;
pub mod reader;
pub mod report;
pub mod writer;

pub use async_reader::AsyncReader;
pub use reader::{read_str, Assembler, ReadOutcome, Reader};
pub use report::{write_entries_csv, write_json, EntryRow};
pub use writer::write_ach;

use crate::cli::OutputFormat;
use crate::core::File;
use crate::types::AchError;
use std::io::Write;

/// Write the file in the requested output format
pub fn write_output(
    file: &File,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), AchError> {
    match format {
        OutputFormat::Csv => write_entries_csv(file, output),
        OutputFormat::Json => write_json(file, output),
        OutputFormat::Ach => write_ach(file, output),
    }
}
