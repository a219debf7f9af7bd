//! Record codecs
//!
//! One module per physical record type. Every record follows the same
//! two-phase contract:
//!
//! - [`Record::parse`] decodes a 94-character line and never fails. A line of
//!   the wrong width leaves the record in its zero-value state.
//! - [`Record::validate`] is the single source of truth for field errors and
//!   returns the first one found.
//!
//! Encoding is the `Display` implementation, so `record.to_string()` yields
//! the wire line and `R::parse(line).to_string() == line` for well-formed input.

pub mod addenda;
pub mod adv;
pub mod batch_control;
pub mod batch_header;
pub mod classify;
pub mod entry_detail;
pub mod field;
pub mod file_control;
pub mod file_header;
pub mod iat;

pub use addenda::{
    Addenda, Addenda02, Addenda05, Addenda10, Addenda11, Addenda12, Addenda13, Addenda14,
    Addenda15, Addenda16, Addenda17, Addenda18, Addenda98, Addenda99, AddendaTxp, TxpAmount,
};
pub use adv::{AdvBatchControl, AdvEntryDetail, AdvFileControl};
pub use batch_control::BatchControl;
pub use batch_header::BatchHeader;
pub use classify::{AddendaType, RecordKind};
pub use entry_detail::{Category, EntryDetail};
pub use file_control::FileControl;
pub use file_header::FileHeader;
pub use iat::{IatBatchHeader, IatEntryDetail};

use crate::types::FieldError;
use std::fmt::Display;

/// Shared capability set of every fixed-width record
pub trait Record: Display + Default + Sized {
    /// Record name used in diagnostics
    const NAME: &'static str;

    /// Decode a line; a line of the wrong width yields `Self::default()`
    fn parse(line: &str) -> Self;

    /// Check every field, returning the first failure
    fn validate(&self) -> Result<(), FieldError>;
}

/// Addenda records additionally expose their two-digit type code
pub trait AddendaRecord: Record {
    const TYPE_CODE: &'static str;

    fn type_code(&self) -> &'static str {
        Self::TYPE_CODE
    }
}
