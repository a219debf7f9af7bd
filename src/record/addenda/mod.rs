//! Addenda records (`7`)
//!
//! The two-digit type code at positions 2-3 selects the variant. [`Addenda`]
//! is the closed set of variants the reader can hand to an entry.

mod forward;
mod iat;
mod returns;
mod txp;

pub use forward::{Addenda02, Addenda05};
pub use iat::{
    Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15, Addenda16, Addenda17,
    Addenda18, IAT_TRANSACTION_TYPE_CODES,
};
pub use returns::{Addenda98, Addenda99};
pub use txp::{AddendaTxp, TxpAmount};

use super::classify::AddendaType;
use super::{AddendaRecord, Record};
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any addenda record, dispatched by type code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type_code")]
pub enum Addenda {
    #[serde(rename = "02")]
    A02(Addenda02),
    #[serde(rename = "05")]
    A05(Addenda05),
    #[serde(rename = "10")]
    A10(Addenda10),
    #[serde(rename = "11")]
    A11(Addenda11),
    #[serde(rename = "12")]
    A12(Addenda12),
    #[serde(rename = "13")]
    A13(Addenda13),
    #[serde(rename = "14")]
    A14(Addenda14),
    #[serde(rename = "15")]
    A15(Addenda15),
    #[serde(rename = "16")]
    A16(Addenda16),
    #[serde(rename = "17")]
    A17(Addenda17),
    #[serde(rename = "18")]
    A18(Addenda18),
    #[serde(rename = "98")]
    A98(Addenda98),
    #[serde(rename = "99")]
    A99(Addenda99),
    /// A type code no variant matches; kept so `validate` can report it
    Unknown { code: String, line: String },
}

impl Addenda {
    /// Decode an addenda line by its type code
    ///
    /// Never fails: an unknown type code yields [`Addenda::Unknown`].
    pub fn parse(line: &str) -> Self {
        match AddendaType::classify(line) {
            Some(AddendaType::Terminal) => Addenda::A02(Addenda02::parse(line)),
            Some(AddendaType::PaymentInformation) => Addenda::A05(Addenda05::parse(line)),
            Some(AddendaType::IatTransaction) => Addenda::A10(Addenda10::parse(line)),
            Some(AddendaType::IatOriginatorName) => Addenda::A11(Addenda11::parse(line)),
            Some(AddendaType::IatOriginatorLocation) => Addenda::A12(Addenda12::parse(line)),
            Some(AddendaType::IatOdfi) => Addenda::A13(Addenda13::parse(line)),
            Some(AddendaType::IatRdfi) => Addenda::A14(Addenda14::parse(line)),
            Some(AddendaType::IatReceiverAddress) => Addenda::A15(Addenda15::parse(line)),
            Some(AddendaType::IatReceiverLocation) => Addenda::A16(Addenda16::parse(line)),
            Some(AddendaType::IatPaymentInformation) => Addenda::A17(Addenda17::parse(line)),
            Some(AddendaType::IatCorrespondentBank) => Addenda::A18(Addenda18::parse(line)),
            Some(AddendaType::NotificationOfChange) => Addenda::A98(Addenda98::parse(line)),
            Some(AddendaType::Return) => Addenda::A99(Addenda99::parse(line)),
            None => Addenda::Unknown {
                code: line.chars().skip(1).take(2).collect(),
                line: line.to_string(),
            },
        }
    }

    pub fn type_code(&self) -> &str {
        match self {
            Addenda::A02(a) => a.type_code(),
            Addenda::A05(a) => a.type_code(),
            Addenda::A10(a) => a.type_code(),
            Addenda::A11(a) => a.type_code(),
            Addenda::A12(a) => a.type_code(),
            Addenda::A13(a) => a.type_code(),
            Addenda::A14(a) => a.type_code(),
            Addenda::A15(a) => a.type_code(),
            Addenda::A16(a) => a.type_code(),
            Addenda::A17(a) => a.type_code(),
            Addenda::A18(a) => a.type_code(),
            Addenda::A98(a) => a.type_code(),
            Addenda::A99(a) => a.type_code(),
            Addenda::Unknown { code, .. } => code,
        }
    }

    /// Record name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Addenda::A02(_) => Addenda02::NAME,
            Addenda::A05(_) => Addenda05::NAME,
            Addenda::A10(_) => Addenda10::NAME,
            Addenda::A11(_) => Addenda11::NAME,
            Addenda::A12(_) => Addenda12::NAME,
            Addenda::A13(_) => Addenda13::NAME,
            Addenda::A14(_) => Addenda14::NAME,
            Addenda::A15(_) => Addenda15::NAME,
            Addenda::A16(_) => Addenda16::NAME,
            Addenda::A17(_) => Addenda17::NAME,
            Addenda::A18(_) => Addenda18::NAME,
            Addenda::A98(_) => Addenda98::NAME,
            Addenda::A99(_) => Addenda99::NAME,
            Addenda::Unknown { .. } => "Addenda",
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        match self {
            Addenda::A02(a) => a.validate(),
            Addenda::A05(a) => a.validate(),
            Addenda::A10(a) => a.validate(),
            Addenda::A11(a) => a.validate(),
            Addenda::A12(a) => a.validate(),
            Addenda::A13(a) => a.validate(),
            Addenda::A14(a) => a.validate(),
            Addenda::A15(a) => a.validate(),
            Addenda::A16(a) => a.validate(),
            Addenda::A17(a) => a.validate(),
            Addenda::A18(a) => a.validate(),
            Addenda::A98(a) => a.validate(),
            Addenda::A99(a) => a.validate(),
            Addenda::Unknown { code, .. } => Err(FieldError::new(
                "TypeCode",
                code,
                FieldErrorKind::AddendaTypeCode,
            )),
        }
    }
}

impl fmt::Display for Addenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addenda::A02(a) => fmt::Display::fmt(a, f),
            Addenda::A05(a) => fmt::Display::fmt(a, f),
            Addenda::A10(a) => fmt::Display::fmt(a, f),
            Addenda::A11(a) => fmt::Display::fmt(a, f),
            Addenda::A12(a) => fmt::Display::fmt(a, f),
            Addenda::A13(a) => fmt::Display::fmt(a, f),
            Addenda::A14(a) => fmt::Display::fmt(a, f),
            Addenda::A15(a) => fmt::Display::fmt(a, f),
            Addenda::A16(a) => fmt::Display::fmt(a, f),
            Addenda::A17(a) => fmt::Display::fmt(a, f),
            Addenda::A18(a) => fmt::Display::fmt(a, f),
            Addenda::A98(a) => fmt::Display::fmt(a, f),
            Addenda::A99(a) => fmt::Display::fmt(a, f),
            Addenda::Unknown { line, .. } => f.write_str(line),
        }
    }
}
