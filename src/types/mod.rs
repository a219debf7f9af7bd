//! Types module
//!
//! Contains the code tables, validation options and error types shared by
//! every record and batch type.
//! - `codes`: service class, SEC and transaction code tables, reason dictionaries
//! - `options`: validation overrides
//! - `error`: error types for the engine

pub mod codes;
pub mod error;
pub mod options;

pub use codes::{Direction, SecCode};
pub use error::{
    AchError, BatchError, BatchErrorKind, ErrorList, FieldError, FieldErrorKind, FileError,
    StructureError,
};
pub use options::{TransactionCodeCheck, ValidateOpts};
