//! Validation overrides
//!
//! [`ValidateOpts`] lets a caller relax or replace the built-in NACHA rules,
//! e.g. accepting non-standard return codes or a custom transaction code
//! predicate. Absent an override the built-in tables apply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied transaction code predicate
///
/// Replaces the built-in transaction code table when set on
/// [`ValidateOpts::custom_transaction_code`].
#[derive(Clone)]
pub struct TransactionCodeCheck(Arc<dyn Fn(u8) -> bool + Send + Sync>);

impl TransactionCodeCheck {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(u8) -> bool + Send + Sync + 'static,
    {
        TransactionCodeCheck(Arc::new(f))
    }

    pub fn accepts(&self, code: u8) -> bool {
        (self.0)(code)
    }
}

impl fmt::Debug for TransactionCodeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransactionCodeCheck(..)")
    }
}

impl PartialEq for TransactionCodeCheck {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TransactionCodeCheck {}

/// Validation overrides applied to files, batches, entries and addenda
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateOpts {
    /// Skip every validation check
    pub skip_all: bool,
    /// Require the immediate origin to be a routing number with a valid check digit
    pub require_aba_origin: bool,
    /// Skip immediate origin checks entirely
    pub bypass_origin_validation: bool,
    /// Skip immediate destination checks entirely
    pub bypass_destination_validation: bool,
    /// Accept return codes outside the NACHA dictionary
    pub custom_return_codes: bool,
    /// Allow batch header and control service class codes to differ
    pub unequal_service_class_code: bool,
    /// Do not record a missing File Header as an error
    pub allow_missing_file_header: bool,
    /// Do not record a missing File Control as an error
    pub allow_missing_file_control: bool,
    /// Accept files with no batches
    pub allow_zero_batches: bool,
    /// Replace the built-in transaction code table
    #[serde(skip)]
    pub custom_transaction_code: Option<TransactionCodeCheck>,
}

impl ValidateOpts {
    /// Whether the transaction code is acceptable, honoring any custom predicate
    pub fn accepts_transaction_code(&self, code: u8, builtin: impl Fn(u8) -> bool) -> bool {
        match &self.custom_transaction_code {
            Some(check) => check.accepts(code),
            None => builtin(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codes::is_valid_transaction_code;

    #[test]
    fn test_builtin_transaction_codes_by_default() {
        let opts = ValidateOpts::default();
        assert!(opts.accepts_transaction_code(22, is_valid_transaction_code));
        assert!(!opts.accepts_transaction_code(99, is_valid_transaction_code));
    }

    #[test]
    fn test_custom_transaction_code_predicate_replaces_table() {
        let opts = ValidateOpts {
            custom_transaction_code: Some(TransactionCodeCheck::new(|code| code == 99)),
            ..ValidateOpts::default()
        };
        assert!(opts.accepts_transaction_code(99, is_valid_transaction_code));
        assert!(!opts.accepts_transaction_code(22, is_valid_transaction_code));
    }
}
