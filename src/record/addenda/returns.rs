//! Return (99) and notification of change (98) addenda

use super::super::field::{
    alpha_field, is_valid_yymmdd, require_alphanumeric, require_numeric, require_present,
    require_text, string_field, Slots,
};
use super::super::{AddendaRecord, Record};
use crate::types::codes::{lookup_change_code, lookup_return_code, ReasonCode};
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification of change: the receiving bank reports corrected account data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda98 {
    pub change_code: String,
    pub original_trace: String,
    /// First 8 digits of the routing number of the original entry
    pub original_dfi: String,
    pub corrected_data: String,
    pub trace_number: String,
}

impl Addenda98 {
    pub fn change_code_reason(&self) -> Option<&'static ReasonCode> {
        lookup_change_code(&self.change_code)
    }
}

impl Record for Addenda98 {
    const NAME: &'static str = "Addenda98";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda98::default();
        };
        Addenda98 {
            change_code: s.alpha(3..6),
            original_trace: s.alpha(6..21),
            original_dfi: s.alpha(27..35),
            corrected_data: s.alpha(35..64),
            trace_number: s.alpha(79..94),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.change_code_reason().is_none() {
            return Err(FieldError::new(
                "ChangeCode",
                &self.change_code,
                FieldErrorKind::ChangeCode,
            ));
        }
        require_present("OriginalTrace", &self.original_trace)?;
        require_numeric("OriginalTrace", &self.original_trace)?;
        require_present("OriginalDFI", &self.original_dfi)?;
        require_numeric("OriginalDFI", &self.original_dfi)?;
        require_text("CorrectedData", &self.corrected_data)?;
        require_numeric("TraceNumber", &self.trace_number)
    }
}

impl AddendaRecord for Addenda98 {
    const TYPE_CODE: &'static str = "98";
}

impl fmt::Display for Addenda98 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "798{}{}{:6}{}{}{:15}{}",
            alpha_field(&self.change_code, 3),
            string_field(&self.original_trace, 15),
            "",
            string_field(&self.original_dfi, 8),
            alpha_field(&self.corrected_data, 29),
            "",
            string_field(&self.trace_number, 15),
        )
    }
}

/// Returned entry: the receiving bank sends the entry back with a reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda99 {
    pub return_code: String,
    pub original_trace: String,
    /// YYMMDD, only for death related returns
    pub date_of_death: String,
    pub original_dfi: String,
    pub addenda_information: String,
    pub trace_number: String,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl Addenda99 {
    pub fn new(return_code: &str) -> Self {
        Addenda99 {
            return_code: return_code.to_string(),
            ..Addenda99::default()
        }
    }

    /// Install validation overrides, e.g. accepting non-dictionary return codes
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    pub fn return_code_reason(&self) -> Option<&'static ReasonCode> {
        lookup_return_code(&self.return_code)
    }
}

impl Record for Addenda99 {
    const NAME: &'static str = "Addenda99";

    fn parse(line: &str) -> Self {
        let Some(s) = Slots::new(line) else {
            return Addenda99::default();
        };
        Addenda99 {
            return_code: s.alpha(3..6),
            original_trace: s.alpha(6..21),
            date_of_death: s.alpha(21..27),
            original_dfi: s.alpha(27..35),
            addenda_information: s.alpha(35..79),
            trace_number: s.alpha(79..94),
            validate_opts: None,
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        let custom_codes = self
            .validate_opts
            .as_ref()
            .is_some_and(|opts| opts.custom_return_codes);
        if custom_codes {
            require_text("ReturnCode", &self.return_code)?;
        } else if self.return_code_reason().is_none() {
            return Err(FieldError::new(
                "ReturnCode",
                &self.return_code,
                FieldErrorKind::ReturnCode,
            ));
        }
        require_present("OriginalTrace", &self.original_trace)?;
        require_numeric("OriginalTrace", &self.original_trace)?;
        if !self.date_of_death.is_empty() && !is_valid_yymmdd(&self.date_of_death) {
            return Err(FieldError::new(
                "DateOfDeath",
                &self.date_of_death,
                FieldErrorKind::InvalidDate,
            ));
        }
        require_numeric("OriginalDFI", &self.original_dfi)?;
        require_alphanumeric("AddendaInformation", &self.addenda_information)?;
        require_numeric("TraceNumber", &self.trace_number)
    }
}

impl AddendaRecord for Addenda99 {
    const TYPE_CODE: &'static str = "99";
}

impl fmt::Display for Addenda99 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "799{}{}{}{}{}{}",
            alpha_field(&self.return_code, 3),
            string_field(&self.original_trace, 15),
            alpha_field(&self.date_of_death, 6),
            string_field(&self.original_dfi, 8),
            alpha_field(&self.addenda_information, 44),
            string_field(&self.trace_number, 15),
        )
    }
}
