//! Record classification by discriminator
//!
//! The first character of a line names the record kind. For addenda the
//! type code at positions 2-3 names the variant.

use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    FileHeader,
    BatchHeader,
    EntryDetail,
    Addenda,
    BatchControl,
    FileControl,
}

impl RecordKind {
    /// Classify a line by its record type code
    pub fn classify(line: &str) -> Result<Self, FieldError> {
        match line.chars().next() {
            Some('1') => Ok(RecordKind::FileHeader),
            Some('5') => Ok(RecordKind::BatchHeader),
            Some('6') => Ok(RecordKind::EntryDetail),
            Some('7') => Ok(RecordKind::Addenda),
            Some('8') => Ok(RecordKind::BatchControl),
            Some('9') => Ok(RecordKind::FileControl),
            other => Err(FieldError::new(
                "RecordType",
                other.map(String::from).unwrap_or_default(),
                FieldErrorKind::RecordType,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::FileHeader => "FileHeader",
            RecordKind::BatchHeader => "BatchHeader",
            RecordKind::EntryDetail => "EntryDetail",
            RecordKind::Addenda => "Addenda",
            RecordKind::BatchControl => "BatchControl",
            RecordKind::FileControl => "FileControl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddendaType {
    /// 02
    Terminal,
    /// 05
    PaymentInformation,
    /// 10
    IatTransaction,
    /// 11
    IatOriginatorName,
    /// 12
    IatOriginatorLocation,
    /// 13
    IatOdfi,
    /// 14
    IatRdfi,
    /// 15
    IatReceiverAddress,
    /// 16
    IatReceiverLocation,
    /// 17
    IatPaymentInformation,
    /// 18
    IatCorrespondentBank,
    /// 98
    NotificationOfChange,
    /// 99
    Return,
}

impl AddendaType {
    /// The variant named by positions 2-3; `None` for an unknown type code
    pub fn classify(line: &str) -> Option<Self> {
        let code: String = line.chars().skip(1).take(2).collect();
        Self::from_code(&code)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "02" => AddendaType::Terminal,
            "05" => AddendaType::PaymentInformation,
            "10" => AddendaType::IatTransaction,
            "11" => AddendaType::IatOriginatorName,
            "12" => AddendaType::IatOriginatorLocation,
            "13" => AddendaType::IatOdfi,
            "14" => AddendaType::IatRdfi,
            "15" => AddendaType::IatReceiverAddress,
            "16" => AddendaType::IatReceiverLocation,
            "17" => AddendaType::IatPaymentInformation,
            "18" => AddendaType::IatCorrespondentBank,
            "98" => AddendaType::NotificationOfChange,
            "99" => AddendaType::Return,
            _ => return None,
        })
    }

    pub fn code(&self) -> &'static str {
        match self {
            AddendaType::Terminal => "02",
            AddendaType::PaymentInformation => "05",
            AddendaType::IatTransaction => "10",
            AddendaType::IatOriginatorName => "11",
            AddendaType::IatOriginatorLocation => "12",
            AddendaType::IatOdfi => "13",
            AddendaType::IatRdfi => "14",
            AddendaType::IatReceiverAddress => "15",
            AddendaType::IatReceiverLocation => "16",
            AddendaType::IatPaymentInformation => "17",
            AddendaType::IatCorrespondentBank => "18",
            AddendaType::NotificationOfChange => "98",
            AddendaType::Return => "99",
        }
    }

    /// One of the seven mandatory IAT addenda 10 through 16
    pub fn is_iat_mandatory(&self) -> bool {
        matches!(
            self,
            AddendaType::IatTransaction
                | AddendaType::IatOriginatorName
                | AddendaType::IatOriginatorLocation
                | AddendaType::IatOdfi
                | AddendaType::IatRdfi
                | AddendaType::IatReceiverAddress
                | AddendaType::IatReceiverLocation
        )
    }
}
