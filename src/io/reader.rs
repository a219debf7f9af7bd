//! Assembly state machine and synchronous reader
//!
//! [`Assembler`] turns a sequence of 94-character records into a [`File`]
//! tree. It owns all cursor state (open batch, open entry), so independent
//! streams can be assembled concurrently. Problems are accumulated into an
//! [`ErrorList`] and reading continues; the caller always gets the
//! best-effort tree back.
//!
//! # States
//!
//! ```text
//! AwaitingFile → InFile → InBatch ⇄ InEntry → InFile → ... → Closed
//! ```
//!
//! A stream with no File Header or File Control is still assembled; the
//! missing wrappers are recorded as [`FileError::FileHeader`] and
//! [`FileError::FileControl`] unless the options allow them.

use crate::core::file::{File, FileBatch};
use crate::core::{AdvBatch, Batch, IatBatch};
use crate::record::field::RECORD_LENGTH;
use crate::record::{
    Addenda, AdvBatchControl, AdvEntryDetail, AdvFileControl, BatchControl, BatchHeader,
    Category, EntryDetail, FileControl, FileHeader, IatBatchHeader, IatEntryDetail, Record,
    RecordKind,
};
use crate::types::{
    AchError, ErrorList, FieldError, FieldErrorKind, FileError, StructureError, ValidateOpts,
};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Position of the standard entry class code in a batch header
const SEC_SLOT: std::ops::Range<usize> = 50..53;

/// Where the assembler is in the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    AwaitingFile,
    InFile,
    InBatch,
    InEntry,
    Closed,
}

/// The assembled tree plus every error met while reading
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub file: File,
    pub errors: ErrorList,
    /// Line of a File Control whose totals check was deferred
    deferred_control: Option<usize>,
}

impl ReadOutcome {
    /// Run the File Control totals check skipped while batch validation was deferred
    pub fn check_file_control(&mut self, opts: &ValidateOpts) {
        if let Some(line) = self.deferred_control.take() {
            if let Err(e) = self.file.validate_control(opts) {
                self.errors.push(AchError::parse(line, FileControl::NAME, e));
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The file when no error was recorded, otherwise the accumulated errors
    pub fn into_result(self) -> Result<File, ErrorList> {
        if self.errors.is_empty() {
            Ok(self.file)
        } else {
            Err(self.errors)
        }
    }
}

/// Record-by-record assembly of a [`File`]
#[derive(Debug, Default)]
pub struct Assembler {
    opts: ValidateOpts,
    validate_batches: bool,
    state: State,
    /// 1-based position of the record being handled
    line: usize,
    file: File,
    current: Option<FileBatch>,
    header_line: Option<usize>,
    control_line: Option<usize>,
    errors: ErrorList,
}

impl Assembler {
    /// Create an assembler
    ///
    /// # Arguments
    ///
    /// * `opts` - Validation overrides applied to every batch and the file
    /// * `validate_batches` - Validate each batch as its control record closes it.
    ///   When false, batch validation and the File Control totals check are left
    ///   to the caller (see [`ReadOutcome::check_file_control`]).
    pub fn new(opts: ValidateOpts, validate_batches: bool) -> Self {
        Assembler {
            opts,
            validate_batches,
            ..Assembler::default()
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feed one physical line
    ///
    /// Blank lines are skipped. A line whose length is a multiple of 94 is
    /// split into records. Any other length is recorded as an error.
    pub fn push_line(&mut self, raw: &str) {
        let raw = raw.trim_end_matches(['\r', '\n']);
        if raw.trim().is_empty() {
            self.line += 1;
            return;
        }
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() > RECORD_LENGTH && chars.len() % RECORD_LENGTH == 0 {
            for record in chars.chunks(RECORD_LENGTH) {
                let record: String = record.iter().collect();
                self.push_record(&record);
            }
        } else {
            self.push_record(raw);
        }
    }

    fn push_record(&mut self, record: &str) {
        self.line += 1;
        if record.chars().all(|c| c == '9') {
            return;
        }
        let kind = match RecordKind::classify(record) {
            Ok(kind) => kind,
            Err(e) => return self.error("Record", e),
        };
        let len = record.chars().count();
        if len != RECORD_LENGTH {
            return self.error(
                kind.name(),
                FieldError::new("RecordLength", len, FieldErrorKind::RecordLength { len }),
            );
        }
        if self.state == State::Closed {
            return self.error(kind.name(), StructureError::RecordAfterFileControl);
        }
        match kind {
            RecordKind::FileHeader => self.file_header(record),
            RecordKind::BatchHeader => self.batch_header(record),
            RecordKind::EntryDetail => self.entry_detail(record),
            RecordKind::Addenda => self.addenda(record),
            RecordKind::BatchControl => self.batch_control(record),
            RecordKind::FileControl => self.file_control(record),
        }
    }

    fn error(&mut self, record: &str, error: impl Into<AchError>) {
        self.errors.push(AchError::parse(self.line, record, error));
    }

    fn file_header(&mut self, line: &str) {
        if self.header_line.is_some() {
            return self.error(FileHeader::NAME, StructureError::DuplicateFileHeader);
        }
        if self.state != State::AwaitingFile {
            self.error(FileHeader::NAME, StructureError::FileHeaderAfterBatch);
        }
        let header = FileHeader::parse(line);
        if !self.opts.skip_all {
            if let Err(e) = header.validate_with(&self.opts) {
                self.error(FileHeader::NAME, e);
            }
        }
        self.file.header = Some(header);
        self.header_line = Some(self.line);
        if self.state == State::AwaitingFile {
            self.state = State::InFile;
        }
    }

    fn batch_header(&mut self, line: &str) {
        if self.current.is_some() {
            self.error(BatchHeader::NAME, StructureError::BatchHeaderInsideBatch);
            self.close_batch();
        }
        let sec: String = line.chars().skip(SEC_SLOT.start).take(SEC_SLOT.len()).collect();
        let batch = match sec.as_str() {
            "IAT" => FileBatch::Iat(IatBatch::new(IatBatchHeader::parse(line))),
            "ADV" => FileBatch::Adv(AdvBatch::new(BatchHeader::parse(line))),
            _ => FileBatch::Standard(Batch::new(BatchHeader::parse(line))),
        };
        self.current = Some(batch);
        self.state = State::InBatch;
    }

    fn entry_detail(&mut self, line: &str) {
        match self.current.as_mut() {
            Some(FileBatch::Standard(batch)) => batch.add_entry(EntryDetail::parse(line)),
            Some(FileBatch::Iat(batch)) => batch.add_entry(IatEntryDetail::parse(line)),
            Some(FileBatch::Adv(batch)) => batch.add_entry(AdvEntryDetail::parse(line)),
            None => return self.error(EntryDetail::NAME, StructureError::EntryOutsideBatch),
        }
        self.state = State::InEntry;
    }

    fn addenda(&mut self, line: &str) {
        let addenda = Addenda::parse(line);
        let name = addenda.name();
        if self.state != State::InEntry {
            return self.error(name, StructureError::AddendaOutsideEntry);
        }
        let attached = match self.current.as_mut() {
            Some(FileBatch::Standard(batch)) => batch
                .entries
                .last_mut()
                .map(|entry| attach_standard(entry, addenda)),
            Some(FileBatch::Iat(batch)) => batch
                .entries
                .last_mut()
                .map(|entry| attach_iat(entry, addenda)),
            Some(FileBatch::Adv(batch)) => batch
                .entries
                .last_mut()
                .map(|entry| attach_adv(entry, addenda)),
            None => None,
        };
        match attached {
            Some(Ok(())) => {}
            Some(Err(e)) => self.error(name, e),
            None => self.error(name, StructureError::AddendaOutsideEntry),
        }
    }

    fn batch_control(&mut self, line: &str) {
        match self.current.as_mut() {
            Some(FileBatch::Standard(batch)) => batch.control = BatchControl::parse(line),
            Some(FileBatch::Iat(batch)) => batch.control = BatchControl::parse(line),
            Some(FileBatch::Adv(batch)) => batch.control = AdvBatchControl::parse(line),
            None => return self.error(BatchControl::NAME, StructureError::ControlOutsideBatch),
        }
        self.close_batch();
    }

    /// Validate the open batch if asked to and move it into the file
    fn close_batch(&mut self) {
        let Some(batch) = self.current.take() else {
            return;
        };
        if self.validate_batches {
            if let Err(e) = batch.as_batch().validate_with(&self.opts) {
                self.error(BatchControl::NAME, e);
            }
        }
        self.file.batches.push(batch);
        self.state = State::InFile;
    }

    fn file_control(&mut self, line: &str) {
        if self.current.is_some() {
            self.error(BatchControl::NAME, StructureError::MissingBatchControl);
            self.close_batch();
        }
        if self.file.is_adv() {
            self.file.adv_control = Some(AdvFileControl::parse(line));
        } else {
            self.file.control = Some(FileControl::parse(line));
        }
        self.control_line = Some(self.line);
        self.state = State::Closed;
    }

    fn check_file(&mut self) -> Option<usize> {
        if self.header_line.is_none() && !self.opts.allow_missing_file_header {
            self.errors.push(FileError::FileHeader);
        }
        if let Err(e) = self.file.check_batch_set(&self.opts) {
            self.errors.push(e);
        }
        match self.control_line {
            None if !self.opts.allow_missing_file_control => {
                self.errors.push(FileError::FileControl)
            }
            Some(line) if self.header_line.is_some() && !self.validate_batches => {
                return Some(line);
            }
            Some(line) if self.header_line.is_some() => {
                if let Err(e) = self.file.validate_control(&self.opts) {
                    self.errors.push(AchError::parse(line, FileControl::NAME, e));
                }
            }
            _ => {}
        }
        None
    }

    /// Close any open batch, check the wrappers and hand back the tree
    pub fn finish(mut self) -> ReadOutcome {
        if self.current.is_some() {
            self.error(BatchControl::NAME, StructureError::MissingBatchControl);
            self.close_batch();
        }
        let deferred_control = if self.opts.skip_all {
            None
        } else {
            self.check_file()
        };
        self.file.set_validation(self.opts);
        ReadOutcome {
            file: self.file,
            errors: self.errors,
            deferred_control,
        }
    }
}

fn duplicate(type_code: &str) -> AchError {
    StructureError::DuplicateAddenda {
        type_code: type_code.to_string(),
    }
    .into()
}

fn unexpected(addenda: &Addenda) -> AchError {
    FieldError::new("TypeCode", addenda.type_code(), FieldErrorKind::AddendaTypeCode).into()
}

fn attach_standard(entry: &mut EntryDetail, addenda: Addenda) -> Result<(), AchError> {
    match addenda {
        Addenda::A02(a) if entry.addenda02.is_none() => entry.addenda02 = Some(a),
        Addenda::A02(_) => return Err(duplicate("02")),
        Addenda::A05(a) => entry.addenda05.push(a),
        Addenda::A98(a) if entry.addenda98.is_none() => {
            entry.addenda98 = Some(a);
            entry.category = Category::Noc;
        }
        Addenda::A98(_) => return Err(duplicate("98")),
        Addenda::A99(a) if entry.addenda99.is_none() => {
            entry.addenda99 = Some(a);
            entry.category = Category::Return;
        }
        Addenda::A99(_) => return Err(duplicate("99")),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

/// Addenda10 through Addenda16 must arrive in order before any 17 or 18
fn attach_iat(entry: &mut IatEntryDetail, addenda: Addenda) -> Result<(), AchError> {
    let out_of_sequence = |expected: &str, got: &str| -> AchError {
        StructureError::IatAddendaSequence {
            expected: expected.to_string(),
            got: got.to_string(),
        }
        .into()
    };
    let missing = entry.missing_mandatory_addenda();
    let got = addenda.type_code().to_string();
    let in_chain = matches!(
        addenda,
        Addenda::A10(_)
            | Addenda::A11(_)
            | Addenda::A12(_)
            | Addenda::A13(_)
            | Addenda::A14(_)
            | Addenda::A15(_)
            | Addenda::A16(_)
    );
    if in_chain {
        match missing {
            Some(expected) if expected == got => {}
            Some(expected) => return Err(out_of_sequence(expected, &got)),
            None => return Err(duplicate(&got)),
        }
    }
    match addenda {
        Addenda::A10(a) => entry.addenda10 = Some(a),
        Addenda::A11(a) => entry.addenda11 = Some(a),
        Addenda::A12(a) => entry.addenda12 = Some(a),
        Addenda::A13(a) => entry.addenda13 = Some(a),
        Addenda::A14(a) => entry.addenda14 = Some(a),
        Addenda::A15(a) => entry.addenda15 = Some(a),
        Addenda::A16(a) => entry.addenda16 = Some(a),
        Addenda::A17(a) => match missing {
            Some(expected) => return Err(out_of_sequence(expected, &got)),
            None => entry.addenda17.push(a),
        },
        Addenda::A18(a) => match missing {
            Some(expected) => return Err(out_of_sequence(expected, &got)),
            None => entry.addenda18.push(a),
        },
        Addenda::A98(a) if entry.addenda98.is_none() => entry.set_addenda98(a),
        Addenda::A98(_) => return Err(duplicate("98")),
        Addenda::A99(a) if entry.addenda99.is_none() => entry.set_addenda99(a),
        Addenda::A99(_) => return Err(duplicate("99")),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

fn attach_adv(entry: &mut AdvEntryDetail, addenda: Addenda) -> Result<(), AchError> {
    match addenda {
        Addenda::A99(a) if entry.addenda99.is_none() => {
            entry.addenda99 = Some(a);
            entry.category = Category::Return;
            Ok(())
        }
        Addenda::A99(_) => Err(duplicate("99")),
        other => Err(unexpected(&other)),
    }
}

/// Synchronous reader over any buffered source
pub struct Reader<R> {
    inner: R,
    opts: ValidateOpts,
    validate_batches: bool,
}

impl<R: BufRead> Reader<R> {
    /// Create a reader that validates each batch as it closes
    pub fn new(inner: R) -> Self {
        Reader {
            inner,
            opts: ValidateOpts::default(),
            validate_batches: true,
        }
    }

    /// Install validation overrides
    pub fn with_validation(mut self, opts: ValidateOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Whether batches are validated while reading
    pub fn validate_batches(mut self, validate: bool) -> Self {
        self.validate_batches = validate;
        self
    }

    /// Read every line and assemble the file
    ///
    /// # Errors
    ///
    /// Only an I/O failure is returned as `Err`; content problems are in
    /// [`ReadOutcome::errors`].
    pub fn read(self) -> Result<ReadOutcome, AchError> {
        let mut assembler = Assembler::new(self.opts, self.validate_batches);
        for line in self.inner.lines() {
            assembler.push_line(&line?);
        }
        Ok(assembler.finish())
    }
}

impl Reader<BufReader<fs::File>> {
    /// Open a file on disk
    pub fn from_path(path: &Path) -> Result<Self, AchError> {
        let file = fs::File::open(path).map_err(|e| AchError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;
        Ok(Reader::new(BufReader::with_capacity(64 * 1024, file)))
    }
}

/// Assemble an in-memory document
pub fn read_str(input: &str, opts: ValidateOpts) -> ReadOutcome {
    let mut assembler = Assembler::new(opts, true);
    for line in input.lines() {
        assembler.push_line(line);
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchErrorKind;
    use std::io::Cursor;

    const FILE_HEADER: &str = "101 231380104 1210428822306301200A094101Citadel                Wells Fargo                    ";
    const BATCH_HEADER: &str = "5220Name on Account                     231380104 PPDPAYROLL         230630   1121042880000001";
    const ENTRY: &str = "622231380104123456789        0000025000               Receiver Account Name   1121042880000001";
    const ADDENDA05: &str = "705Vacation pay                                                                    00010000001";
    const BATCH_CONTROL: &str = "82200000020023138010000000000000000000025000231380104                          121042880000001";
    const FILE_CONTROL: &str = "9000001000001000000020023138010000000000000000000025000                                       ";
    const RETURN_ENTRY: &str = "621231380104123456789        0000025000               Receiver Account Name   1121042880000001";
    const ADDENDA99: &str = "799R01121042880000001      12104288                                            121042880000001";
    const RETURN_CONTROL: &str = "82200000020023138010000000000000000000025000231380104                          121042880000001";

    fn document(lines: &[&str]) -> String {
        lines.join("\n")
    }

    fn valid_file() -> String {
        document(&[
            FILE_HEADER,
            BATCH_HEADER,
            ENTRY,
            ADDENDA05,
            BATCH_CONTROL,
            FILE_CONTROL,
        ])
    }

    #[test]
    fn test_fixture_lengths() {
        for line in [
            FILE_HEADER,
            BATCH_HEADER,
            ENTRY,
            ADDENDA05,
            BATCH_CONTROL,
            FILE_CONTROL,
            RETURN_ENTRY,
            ADDENDA99,
            RETURN_CONTROL,
        ] {
            assert_eq!(line.chars().count(), 94, "{line}");
        }
    }

    #[test]
    fn test_reads_valid_file() {
        let outcome = read_str(&valid_file(), ValidateOpts::default());
        assert!(outcome.is_valid(), "{}", outcome.errors);
        let file = outcome.file;
        assert_eq!(file.batches.len(), 1);
        assert_eq!(file.entry_count(), 1);
        assert_eq!(file.lines(), valid_file().lines().collect::<Vec<_>>());
        match &file.batches[0] {
            FileBatch::Standard(batch) => {
                assert_eq!(batch.entries[0].addenda05[0].payment_related_information, "Vacation pay");
            }
            other => panic!("unexpected batch {other:?}"),
        }
    }

    #[test]
    fn test_reader_over_buffered_source() {
        let outcome = Reader::new(Cursor::new(valid_file())).read().unwrap();
        assert!(outcome.is_valid(), "{}", outcome.errors);
    }

    #[test]
    fn test_missing_wrappers_are_accumulated() {
        let input = document(&[BATCH_HEADER, RETURN_ENTRY, ADDENDA99, RETURN_CONTROL]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert_eq!(outcome.file.batches.len(), 1);
        assert_eq!(outcome.file.entry_count(), 1);
        assert!(outcome.errors.contains_file_error(&FileError::FileHeader));
        assert!(outcome.errors.contains_file_error(&FileError::FileControl));
        assert_eq!(outcome.errors.len(), 2, "{}", outcome.errors);

        let opts = ValidateOpts {
            allow_missing_file_header: true,
            allow_missing_file_control: true,
            ..ValidateOpts::default()
        };
        assert!(read_str(&input, opts).is_valid());
    }

    #[test]
    fn test_unwrapped_single_line_file() {
        let unwrapped: String = valid_file().lines().collect();
        let outcome = read_str(&unwrapped, ValidateOpts::default());
        assert!(outcome.is_valid(), "{}", outcome.errors);
        assert_eq!(outcome.file.entry_count(), 1);
    }

    #[test]
    fn test_filler_and_blank_lines_ignored() {
        let filler = "9".repeat(94);
        let input = format!("{}\n\n{}\n{}\n", valid_file(), filler, filler);
        assert!(read_str(&input, ValidateOpts::default()).is_valid());
    }

    #[test]
    fn test_short_line_records_length_error() {
        let input = document(&[FILE_HEADER, BATCH_HEADER, &ENTRY[..90], BATCH_CONTROL, FILE_CONTROL]);
        let outcome = read_str(&input, ValidateOpts::default());
        let first = outcome.errors.iter().next().unwrap();
        assert!(matches!(first, AchError::Parse { line: 3, record, .. } if record == "EntryDetail"));
        assert_eq!(
            first.field_error().map(|e| &e.kind),
            Some(&FieldErrorKind::RecordLength { len: 90 })
        );
    }

    #[test]
    fn test_entry_outside_batch() {
        let input = document(&[FILE_HEADER, ENTRY, FILE_CONTROL]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert!(outcome.errors.any(|e| e.structure_error() == Some(&StructureError::EntryOutsideBatch)));
    }

    #[test]
    fn test_missing_batch_control_at_eof() {
        let input = document(&[FILE_HEADER, BATCH_HEADER, ENTRY, ADDENDA05]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert_eq!(outcome.file.batches.len(), 1);
        assert!(outcome
            .errors
            .any(|e| e.structure_error() == Some(&StructureError::MissingBatchControl)));
    }

    #[test]
    fn test_batch_control_mismatch_is_recoverable() {
        let mut control = BATCH_CONTROL.to_string();
        control.replace_range(43..44, "1");
        let input = document(&[FILE_HEADER, BATCH_HEADER, ENTRY, ADDENDA05, &control, FILE_CONTROL]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert_eq!(outcome.file.batches.len(), 1);
        assert!(outcome.errors.any(|e| matches!(
            e.batch_error().map(|b| &b.kind),
            Some(BatchErrorKind::CalculatedControlEquality { .. })
        )));
    }

    #[test]
    fn test_file_control_totals_checked() {
        let mut control = FILE_CONTROL.to_string();
        control.replace_range(12..13, "2");
        let input = document(&[FILE_HEADER, BATCH_HEADER, ENTRY, ADDENDA05, BATCH_CONTROL, &control]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert!(outcome.errors.any(|e| matches!(
            e.file_error(),
            Some(FileError::Calculated { field_name, .. }) if field_name == "BlockCount"
        )));
    }

    #[test]
    fn test_record_after_file_control() {
        let input = document(&[valid_file().as_str(), BATCH_HEADER]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert!(outcome
            .errors
            .any(|e| e.structure_error() == Some(&StructureError::RecordAfterFileControl)));
    }

    #[test]
    fn test_unknown_record_type() {
        let input = document(&[valid_file().as_str(), format!("4{}", " ".repeat(93)).as_str()]);
        let outcome = read_str(&input, ValidateOpts::default());
        assert!(outcome.errors.any(|e| e
            .field_error()
            .is_some_and(|f| f.kind == FieldErrorKind::RecordType)));
    }
}
