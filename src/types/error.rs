//! Error types for the NACHA engine
//!
//! This module defines the closed set of typed errors surfaced by parsing,
//! building and validating ACH documents. Errors are descriptive enough to be
//! rendered verbatim by a CLI or service layer.
//!
//! # Error Categories
//!
//! - **Field errors** ([`FieldError`]): one field fails a type, format,
//!   presence or range check
//! - **Batch errors** ([`BatchError`]): cross-field or cross-record rule
//!   violations scoped to a single batch
//! - **File errors** ([`FileError`]): missing wrapper records and FileControl
//!   totals that disagree with the batches
//! - **Structure errors** ([`StructureError`]): records that arrive in an order
//!   the reader cannot assemble
//!
//! Reader errors are wrapped in [`AchError::Parse`] together with the line
//! number of the offending record and accumulated in an [`ErrorList`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FieldErrorKind {
    /// A mandatory field still holds its zero value
    #[error("is a mandatory field and has a default value")]
    FieldInclusion,

    #[error("has non alphanumeric characters")]
    NonAlphanumeric,

    #[error("has non numeric characters")]
    NonNumeric,

    #[error("is not uppercase A-Z or 0-9")]
    UpperAlpha,

    /// Routing number check digit does not match the ABA mod-10 calculation
    #[error("does not match calculated check digit {calculated}")]
    ValidCheckDigit { calculated: u8 },

    #[error("is an invalid record type")]
    RecordType,

    #[error("is an invalid addenda type code")]
    AddendaTypeCode,

    #[error("is an invalid transaction code")]
    TransactionCode,

    #[error("is an invalid service class code")]
    ServiceClass,

    #[error("is an invalid standard entry class code")]
    SecCode,

    #[error("is an invalid date")]
    InvalidDate,

    #[error("is an invalid time")]
    InvalidTime,

    #[error("is an invalid return code")]
    ReturnCode,

    #[error("is an invalid change code")]
    ChangeCode,

    #[error("is an invalid addenda record indicator")]
    AddendaRecordIndicator,

    #[error("is an invalid file id modifier")]
    FileIdModifier,

    #[error("must be {expected}")]
    Constant { expected: String },

    #[error("is an invalid card transaction type")]
    CardTransactionType,

    #[error("is an invalid payment type code")]
    PaymentType,

    #[error("is an invalid originator status code")]
    OriginatorStatusCode,

    #[error("is an invalid foreign exchange indicator")]
    ForeignExchangeIndicator,

    #[error("is an invalid foreign exchange reference indicator")]
    ForeignExchangeReferenceIndicator,

    #[error("is an invalid IAT transaction type code")]
    IatTransactionType,

    #[error("is an invalid identification number qualifier")]
    IdNumberQualifier,

    /// Value does not fit into its fixed-width slot
    #[error("exceeds the {width} digit field width")]
    Overflow { width: usize },

    /// A value derived from sibling records disagrees with the stored one
    #[error("does not match expected value {expected}")]
    Mismatch { expected: String },

    /// Structured payment-related information is malformed
    #[error("has invalid variable fields: {reason}")]
    VariableFields { reason: String },

    /// A physical record does not have the fixed record width
    #[error("must be 94 characters and found {len}")]
    RecordLength { len: usize },
}

/// A single field failed validation
///
/// Carries the offending field name and the bad value so callers can render a
/// precise diagnostic without re-deriving context.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field_name} {value} {kind}")]
pub struct FieldError {
    /// Name of the field that failed
    pub field_name: String,
    /// The value that was rejected
    pub value: String,
    /// Why it was rejected
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create a FieldError
    pub fn new(field_name: &str, value: impl ToString, kind: FieldErrorKind) -> Self {
        FieldError {
            field_name: field_name.to_string(),
            value: value.to_string(),
            kind,
        }
    }
}

/// Why a batch was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BatchErrorKind {
    #[error("transaction code {code} is not a debit and the batch only accepts debits")]
    DebitOnly { code: u8 },

    #[error("transaction code {code} is not a credit and the batch only accepts credits")]
    CreditOnly { code: u8 },

    /// Header and control disagree
    #[error("header {want} is not equal to control {got}")]
    HeaderControlEquality { want: String, got: String },

    /// Control totals disagree with the values tabulated from the entries
    #[error("calculated {calculated} is out-of-balance with control {control}")]
    CalculatedControlEquality { calculated: String, control: String },

    #[error("{category} entries may not carry an addenda of type {type_code}")]
    AddendaCategory { category: String, type_code: String },

    #[error("found {got} addenda records, the maximum is {max}")]
    AddendaCount { got: usize, max: usize },

    #[error("{got} exceeds the maximum amount of {max}")]
    Amount { got: u64, max: u64 },

    #[error("amount {got} must be zero")]
    ZeroAmount { got: u64 },

    #[error("transaction code {code} is not allowed")]
    TransactionCode { code: u8 },

    #[error("service class code {service_class} does not allow transaction code {code}")]
    ServiceClassTranCode { service_class: u16, code: u8 },

    #[error("trace number {trace} is not ascending")]
    TraceNumberAscending { trace: String },

    #[error("trace number {trace} does not begin with ODFI {odfi}")]
    TraceNumberNotOdfi { trace: String, odfi: String },

    #[error("addenda trace number {addenda} does not match entry trace number {entry}")]
    AddendaTraceNumber { addenda: String, entry: String },

    #[error("addenda sequence number {got} should be {want}")]
    AddendaSequence { want: u32, got: u32 },

    #[error("addenda record indicator {indicator} does not agree with {count} attached addenda")]
    AddendaIndicator { indicator: u8, count: usize },

    #[error("{category} entries must carry an addenda of type {type_code}")]
    AddendaRequired { category: String, type_code: String },

    #[error("entry category {category} is not permitted")]
    Category { category: String },

    #[error("batch must contain at least one entry")]
    NoEntries,

    /// IAT and ADV entries need their own batch type
    #[error("{sec} is not supported by a standard batch, use {batch_type}")]
    UnsupportedSec { sec: String, batch_type: String },

    /// Field-level failure found while validating the batch
    #[error(transparent)]
    Field(FieldError),
}

/// A batch-level rule violation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("batch #{batch_number} ({sec}) {field_name} {kind}")]
pub struct BatchError {
    /// Batch number from the batch header
    pub batch_number: u32,
    /// Standard entry class code of the batch
    pub sec: String,
    /// Name of the field the rule is anchored on
    pub field_name: String,
    /// The rule that failed
    pub kind: BatchErrorKind,
}

impl BatchError {
    /// Create a BatchError
    pub fn new(batch_number: u32, sec: &str, field_name: &str, kind: BatchErrorKind) -> Self {
        BatchError {
            batch_number,
            sec: sec.to_string(),
            field_name: field_name.to_string(),
            kind,
        }
    }

    /// Wrap a field error raised while validating the batch
    pub fn from_field(batch_number: u32, sec: &str, error: FieldError) -> Self {
        BatchError {
            batch_number,
            sec: sec.to_string(),
            field_name: error.field_name.clone(),
            kind: BatchErrorKind::Field(error),
        }
    }

    /// The wrapped field error, if this batch error came from a field check
    pub fn field_error(&self) -> Option<&FieldError> {
        match &self.kind {
            BatchErrorKind::Field(e) => Some(e),
            _ => None,
        }
    }
}

/// File-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FileError {
    /// The file has no File Header record
    #[error("none or more than one file header exists")]
    FileHeader,

    /// The file has no File Control record
    #[error("none or more than one file control exists")]
    FileControl,

    #[error("file must contain at least one batch")]
    NoBatches,

    #[error("file control {field_name} {control} does not match calculated {calculated}")]
    Calculated {
        field_name: String,
        calculated: String,
        control: String,
    },

    #[error("batch number {got} is not greater than previous batch number {previous}")]
    BatchNumberAscending { previous: u32, got: u32 },

    #[error("ADV batches cannot be mixed with other batch types in one file")]
    AdvMixed,
}

/// Records that arrive in an order the reader cannot assemble
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StructureError {
    #[error("file header already read")]
    DuplicateFileHeader,

    #[error("file header must precede all batches")]
    FileHeaderAfterBatch,

    #[error("batch header found inside an open batch")]
    BatchHeaderInsideBatch,

    #[error("entry detail found outside of a batch")]
    EntryOutsideBatch,

    #[error("addenda found without a preceding entry detail")]
    AddendaOutsideEntry,

    #[error("batch control found without an open batch")]
    ControlOutsideBatch,

    #[error("batch was not closed by a batch control")]
    MissingBatchControl,

    #[error("record found after file control")]
    RecordAfterFileControl,

    #[error("IAT addenda {got} is out of sequence, expected {expected}")]
    IatAddendaSequence { expected: String, got: String },

    #[error("entry already carries an addenda of type {type_code}")]
    DuplicateAddenda { type_code: String },
}

/// Main error type for the NACHA engine
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AchError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Error raised while reading a specific record
    #[error("line {line} ({record}): {source}")]
    Parse {
        /// 1-based record number
        line: usize,
        /// Record name, e.g. "EntryDetail"
        record: String,
        #[source]
        source: Box<AchError>,
    },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for AchError {
    fn from(error: std::io::Error) -> Self {
        AchError::Io {
            message: error.to_string(),
        }
    }
}

impl AchError {
    /// Wrap an error with the line and record it was raised on
    pub fn parse(line: usize, record: &str, source: impl Into<AchError>) -> Self {
        AchError::Parse {
            line,
            record: record.to_string(),
            source: Box::new(source.into()),
        }
    }

    /// The innermost error, looking through `Parse` wrappers
    pub fn root(&self) -> &AchError {
        match self {
            AchError::Parse { source, .. } => source.root(),
            other => other,
        }
    }

    /// The field error at the root of this error, including one wrapped by a batch
    pub fn field_error(&self) -> Option<&FieldError> {
        match self.root() {
            AchError::Field(e) => Some(e),
            AchError::Batch(e) => e.field_error(),
            _ => None,
        }
    }

    /// The batch error at the root of this error
    pub fn batch_error(&self) -> Option<&BatchError> {
        match self.root() {
            AchError::Batch(e) => Some(e),
            _ => None,
        }
    }

    /// The file error at the root of this error
    pub fn file_error(&self) -> Option<&FileError> {
        match self.root() {
            AchError::File(e) => Some(e),
            _ => None,
        }
    }

    /// The structure error at the root of this error
    pub fn structure_error(&self) -> Option<&StructureError> {
        match self.root() {
            AchError::Structure(e) => Some(e),
            _ => None,
        }
    }
}

/// Accumulated, non-fatal errors collected while reading a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorList(Vec<AchError>);

impl ErrorList {
    pub fn new() -> Self {
        ErrorList(Vec::new())
    }

    pub fn push(&mut self, error: impl Into<AchError>) {
        self.0.push(error.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AchError> {
        self.0.iter()
    }

    /// Whether any accumulated error matches the predicate
    pub fn any<F>(&self, f: F) -> bool
    where
        F: Fn(&AchError) -> bool,
    {
        self.0.iter().any(f)
    }

    /// Whether the given file-level error was accumulated
    pub fn contains_file_error(&self, wanted: &FileError) -> bool {
        self.any(|e| e.file_error() == Some(wanted))
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}

impl IntoIterator for ErrorList {
    type Item = AchError;
    type IntoIter = std::vec::IntoIter<AchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<AchError> for ErrorList {
    fn extend<T: IntoIterator<Item = AchError>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::field_inclusion(
        AchError::Field(FieldError::new("CompanyName", "", FieldErrorKind::FieldInclusion)),
        "CompanyName  is a mandatory field and has a default value"
    )]
    #[case::check_digit(
        AchError::Field(FieldError::new("RDFIIdentification", "9", FieldErrorKind::ValidCheckDigit { calculated: 4 })),
        "RDFIIdentification 9 does not match calculated check digit 4"
    )]
    #[case::debit_only(
        AchError::Batch(BatchError::new(1, "ARC", "TransactionCode", BatchErrorKind::DebitOnly { code: 22 })),
        "batch #1 (ARC) TransactionCode transaction code 22 is not a debit and the batch only accepts debits"
    )]
    #[case::header_control(
        AchError::Batch(BatchError::new(3, "PPD", "ServiceClassCode", BatchErrorKind::HeaderControlEquality { want: "220".into(), got: "225".into() })),
        "batch #3 (PPD) ServiceClassCode header 220 is not equal to control 225"
    )]
    #[case::amount(
        AchError::Batch(BatchError::new(1, "BOC", "Amount", BatchErrorKind::Amount { got: 2500001, max: 2500000 })),
        "batch #1 (BOC) Amount 2500001 exceeds the maximum amount of 2500000"
    )]
    #[case::file_header(AchError::File(FileError::FileHeader), "none or more than one file header exists")]
    #[case::parse(
        AchError::parse(7, "EntryDetail", StructureError::EntryOutsideBatch),
        "line 7 (EntryDetail): entry detail found outside of a batch"
    )]
    #[case::io(AchError::Io { message: "Permission denied".into() }, "I/O error: Permission denied")]
    fn test_error_display(#[case] error: AchError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_root_looks_through_parse_wrappers() {
        let error = AchError::parse(
            4,
            "BatchControl",
            BatchError::from_field(
                2,
                "PPD",
                FieldError::new("Amount", "x", FieldErrorKind::NonNumeric),
            ),
        );
        assert!(error.batch_error().is_some());
        assert_eq!(error.field_error().unwrap().field_name, "Amount");
        assert!(error.file_error().is_none());
    }

    #[test]
    fn test_error_list_display_joins_lines() {
        let mut errors = ErrorList::new();
        errors.push(FileError::FileHeader);
        errors.push(FileError::FileControl);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_file_error(&FileError::FileControl));
        assert_eq!(
            errors.to_string(),
            "none or more than one file header exists\nnone or more than one file control exists"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: AchError = io_error.into();
        assert!(matches!(error, AchError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
