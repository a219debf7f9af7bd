//! TXP tax payment segment carried in Addenda05 payment information
//!
//! Layout: `TXP*<TIN>*<tax code>*<period end YYMMDD>*<amount type>*<amount>[*<amount type>*<amount>...][*<verification>]\`
//! where amounts are whole cents without a decimal point.

use super::super::field::{is_numeric, is_valid_yymmdd};
use crate::types::{FieldError, FieldErrorKind, ValidateOpts};
use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "TXP*";
const TERMINATOR: char = '\\';

/// One amount type / amount pair of a TXP segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxpAmount {
    pub code: String,
    pub amount_cents: u64,
}

/// Decoded TXP segment
///
/// `parse` is best effort and never fails. `validate` re-checks the framing of
/// the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddendaTxp {
    /// The segment as it was received
    pub payment_related_information: String,
    /// Taxpayer identification number
    pub tin: String,
    pub tax_code: String,
    /// YYMMDD
    pub period_end: String,
    pub amounts: Vec<TxpAmount>,
    pub taxpayer_verification: Option<String>,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl AddendaTxp {
    /// Build a segment from its parts
    pub fn new(tin: &str, tax_code: &str, period_end: &str, amounts: Vec<TxpAmount>) -> Self {
        let mut txp = AddendaTxp {
            tin: tin.to_string(),
            tax_code: tax_code.to_string(),
            period_end: period_end.to_string(),
            amounts,
            ..AddendaTxp::default()
        };
        txp.payment_related_information = txp.segment();
        txp
    }

    /// Decode a segment; unparseable pieces are left empty
    pub fn parse(payment_related_information: &str) -> Self {
        let mut txp = AddendaTxp {
            payment_related_information: payment_related_information.to_string(),
            ..AddendaTxp::default()
        };
        let body = payment_related_information
            .trim_end()
            .strip_prefix(PREFIX)
            .unwrap_or(payment_related_information);
        let body = body.strip_suffix(TERMINATOR).unwrap_or(body);
        let parts: Vec<&str> = body.split('*').collect();
        let mut parts = parts.into_iter();
        txp.tin = parts.next().unwrap_or_default().to_string();
        txp.tax_code = parts.next().unwrap_or_default().to_string();
        txp.period_end = parts.next().unwrap_or_default().to_string();
        let rest: Vec<&str> = parts.collect();
        for pair in rest.chunks(2) {
            match pair {
                [code, amount] => txp.amounts.push(TxpAmount {
                    code: code.to_string(),
                    amount_cents: amount.parse().unwrap_or(0),
                }),
                [verification] => txp.taxpayer_verification = Some(verification.to_string()),
                _ => {}
            }
        }
        txp
    }

    /// Install validation overrides used by [`AddendaTxp::validate`]
    ///
    /// Only `skip_all` concerns a TXP segment; the remaining overrides relax
    /// routing, return codes and transaction codes, which the segment does not carry.
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validate_opts.as_ref()
    }

    /// Re-encode the segment from the decoded parts
    pub fn segment(&self) -> String {
        let mut out = format!("{PREFIX}{}*{}*{}", self.tin, self.tax_code, self.period_end);
        for amount in &self.amounts {
            out.push_str(&format!("*{}*{}", amount.code, amount.amount_cents));
        }
        if let Some(verification) = &self.taxpayer_verification {
            out.push('*');
            out.push_str(verification);
        }
        out.push(TERMINATOR);
        out
    }

    /// Sum of every amount in the segment
    pub fn total_cents(&self) -> u64 {
        self.amounts.iter().map(|a| a.amount_cents).sum()
    }

    /// Check the framing, character set and each component
    pub fn validate(&self) -> Result<(), FieldError> {
        match &self.validate_opts {
            Some(opts) => self.validate_with(opts),
            None => self.validate_with(&ValidateOpts::default()),
        }
    }

    /// Validate with explicit overrides, ignoring any installed ones
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<(), FieldError> {
        if opts.skip_all {
            return Ok(());
        }
        let raw = self.payment_related_information.trim_end();
        let fail = |reason: &str| {
            Err(FieldError::new(
                "PaymentRelatedInformation",
                raw,
                FieldErrorKind::VariableFields {
                    reason: reason.to_string(),
                },
            ))
        };
        let Some(body) = raw.strip_prefix(PREFIX) else {
            return fail("must begin with TXP*");
        };
        let Some(body) = body.strip_suffix(TERMINATOR) else {
            return fail("must end with a backslash");
        };
        if !body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '*')
        {
            return fail("contains a character outside A-Z, 0-9, space and *");
        }
        let parts: Vec<&str> = body.split('*').collect();
        if parts.len() < 5 {
            return fail("requires a TIN, tax code, period end and at least one amount");
        }
        if parts[0].trim().is_empty() {
            return fail("taxpayer identification number is missing");
        }
        if parts[1].trim().is_empty() {
            return fail("tax payment type code is missing");
        }
        if !is_valid_yymmdd(parts[2]) {
            return fail("tax period end date must be YYMMDD");
        }
        for pair in parts[3..].chunks(2) {
            if let [code, amount] = pair {
                if code.trim().is_empty() {
                    return fail("amount type is missing");
                }
                if amount.is_empty() || !is_numeric(amount) {
                    return fail("amount must be whole cents");
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AddendaTxp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}
