//! Code tables shared by every record type
//!
//! Service class codes, standard entry class codes, transaction code
//! classification and the return/change reason dictionaries. All tables are
//! static and read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service class code for batches carrying both debits and credits
pub const MIXED_DEBITS_AND_CREDITS: u16 = 200;
/// Service class code for credit-only batches
pub const CREDITS_ONLY: u16 = 220;
/// Service class code for debit-only batches
pub const DEBITS_ONLY: u16 = 225;
/// Service class code for ADV batches
pub const AUTOMATED_ACCOUNTING_ADVICES: u16 = 280;

/// Whether a service class code is one NACHA defines
pub fn is_valid_service_class(code: u16) -> bool {
    matches!(
        code,
        MIXED_DEBITS_AND_CREDITS | CREDITS_ONLY | DEBITS_ONLY | AUTOMATED_ACCOUNTING_ADVICES
    )
}

/// Standard Entry Class code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecCode {
    Ack,
    Adv,
    Arc,
    Atx,
    Boc,
    Ccd,
    Cie,
    Cor,
    Ctx,
    Dne,
    Enr,
    Iat,
    Mte,
    Pop,
    Pos,
    Ppd,
    Rck,
    Shr,
    Tel,
    Trc,
    Trx,
    Web,
    Xck,
}

impl SecCode {
    /// Every supported code, in alphabetical order
    pub const ALL: [SecCode; 23] = [
        SecCode::Ack,
        SecCode::Adv,
        SecCode::Arc,
        SecCode::Atx,
        SecCode::Boc,
        SecCode::Ccd,
        SecCode::Cie,
        SecCode::Cor,
        SecCode::Ctx,
        SecCode::Dne,
        SecCode::Enr,
        SecCode::Iat,
        SecCode::Mte,
        SecCode::Pop,
        SecCode::Pos,
        SecCode::Ppd,
        SecCode::Rck,
        SecCode::Shr,
        SecCode::Tel,
        SecCode::Trc,
        SecCode::Trx,
        SecCode::Web,
        SecCode::Xck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecCode::Ack => "ACK",
            SecCode::Adv => "ADV",
            SecCode::Arc => "ARC",
            SecCode::Atx => "ATX",
            SecCode::Boc => "BOC",
            SecCode::Ccd => "CCD",
            SecCode::Cie => "CIE",
            SecCode::Cor => "COR",
            SecCode::Ctx => "CTX",
            SecCode::Dne => "DNE",
            SecCode::Enr => "ENR",
            SecCode::Iat => "IAT",
            SecCode::Mte => "MTE",
            SecCode::Pop => "POP",
            SecCode::Pos => "POS",
            SecCode::Ppd => "PPD",
            SecCode::Rck => "RCK",
            SecCode::Shr => "SHR",
            SecCode::Tel => "TEL",
            SecCode::Trc => "TRC",
            SecCode::Trx => "TRX",
            SecCode::Web => "WEB",
            SecCode::Xck => "XCK",
        }
    }
}

impl fmt::Display for SecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

/// Direction of money movement for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// Single-letter form used in reports ("D" / "C")
    pub fn letter(&self) -> &'static str {
        match self {
            Direction::Debit => "D",
            Direction::Credit => "C",
        }
    }
}

/// Transaction codes valid on standard and IAT entries
const TRANSACTION_CODES: [u8; 30] = [
    21, 22, 23, 24, 26, 27, 28, 29, // checking
    31, 32, 33, 34, 36, 37, 38, 39, // savings
    41, 42, 43, 44, 46, 47, 48, 49, // general ledger
    51, 52, 53, 54, 55, 56, // loan
];

/// Whether `code` is a valid standard entry transaction code
pub fn is_valid_transaction_code(code: u8) -> bool {
    TRANSACTION_CODES.contains(&code)
}

/// Whether `code` is a valid ADV transaction code (81-88)
pub fn is_valid_adv_transaction_code(code: u8) -> bool {
    (81..=88).contains(&code)
}

/// Direction of a standard transaction code
///
/// Units digits 1-4 are credits (return, live, prenote, zero-dollar) and 5-9
/// are debits. For live entries this agrees with the even-credit /
/// odd-debit parity convention.
pub fn direction(code: u8) -> Option<Direction> {
    match code % 10 {
        1..=4 => Some(Direction::Credit),
        5..=9 => Some(Direction::Debit),
        _ => None,
    }
}

/// Direction of an ADV transaction code: odd codes credit, even codes debit
pub fn adv_direction(code: u8) -> Option<Direction> {
    if !is_valid_adv_transaction_code(code) {
        return None;
    }
    if code % 2 == 1 {
        Some(Direction::Credit)
    } else {
        Some(Direction::Debit)
    }
}

/// Prenotification codes (units digit 3 or 8) must carry a zero amount
pub fn is_prenote(code: u8) -> bool {
    matches!(code % 10, 3 | 8)
}

/// Zero-dollar remittance codes (units digit 4 or 9)
pub fn is_zero_dollar(code: u8) -> bool {
    matches!(code % 10, 4 | 9)
}

/// Automated return or notification-of-change codes (units digit 1 or 6)
pub fn is_return_or_noc(code: u8) -> bool {
    matches!(code % 10, 1 | 6)
}

/// A return or change reason from the NACHA dictionaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonCode {
    pub code: &'static str,
    pub reason: &'static str,
}

pub const RETURN_CODES: &[ReasonCode] = &[
    ReasonCode { code: "R01", reason: "Insufficient Funds" },
    ReasonCode { code: "R02", reason: "Account Closed" },
    ReasonCode { code: "R03", reason: "No Account/Unable to Locate Account" },
    ReasonCode { code: "R04", reason: "Invalid Account Number Structure" },
    ReasonCode { code: "R05", reason: "Unauthorized Debit to Consumer Account Using Corporate SEC Code" },
    ReasonCode { code: "R06", reason: "Returned per ODFI's Request" },
    ReasonCode { code: "R07", reason: "Authorization Revoked by Customer" },
    ReasonCode { code: "R08", reason: "Payment Stopped" },
    ReasonCode { code: "R09", reason: "Uncollected Funds" },
    ReasonCode { code: "R10", reason: "Customer Advises Not Authorized" },
    ReasonCode { code: "R11", reason: "Customer Advises Entry Not in Accordance with the Terms of the Authorization" },
    ReasonCode { code: "R12", reason: "Branch Sold to Another DFI" },
    ReasonCode { code: "R13", reason: "RDFI not qualified to participate" },
    ReasonCode { code: "R14", reason: "Representative payee deceased or unable to continue in that capacity" },
    ReasonCode { code: "R15", reason: "Beneficiary or bank account holder deceased" },
    ReasonCode { code: "R16", reason: "Bank account frozen" },
    ReasonCode { code: "R17", reason: "File record edit criteria" },
    ReasonCode { code: "R18", reason: "Improper effective entry date" },
    ReasonCode { code: "R19", reason: "Amount field error" },
    ReasonCode { code: "R20", reason: "Non-payment bank account" },
    ReasonCode { code: "R21", reason: "Invalid company ID number" },
    ReasonCode { code: "R22", reason: "Invalid individual ID number" },
    ReasonCode { code: "R23", reason: "Credit entry refused by receiver" },
    ReasonCode { code: "R24", reason: "Duplicate entry" },
    ReasonCode { code: "R25", reason: "Addenda error" },
    ReasonCode { code: "R26", reason: "Mandatory field error" },
    ReasonCode { code: "R27", reason: "Trace number error" },
    ReasonCode { code: "R28", reason: "Routing number check digit error" },
    ReasonCode { code: "R29", reason: "Corporate customer advises not authorized" },
    ReasonCode { code: "R30", reason: "RDFI not participant in check truncation program" },
    ReasonCode { code: "R31", reason: "Permissible return entry (CCD and CTX only)" },
    ReasonCode { code: "R32", reason: "RDFI non-settlement" },
    ReasonCode { code: "R33", reason: "Return of XCK entry" },
    ReasonCode { code: "R34", reason: "Limited participation RDFI" },
    ReasonCode { code: "R35", reason: "Return of improper debit entry" },
    ReasonCode { code: "R36", reason: "Return of Improper Credit Entry" },
    ReasonCode { code: "R37", reason: "Source Document Presented for Payment" },
    ReasonCode { code: "R38", reason: "Stop Payment on Source Document" },
    ReasonCode { code: "R39", reason: "Improper Source Document" },
    ReasonCode { code: "R40", reason: "Return of ENR Entry by Federal Government Agency" },
    ReasonCode { code: "R41", reason: "Invalid Transaction Code" },
    ReasonCode { code: "R42", reason: "Routing Number/Check Digit Error" },
    ReasonCode { code: "R43", reason: "Invalid DFI Account Number" },
    ReasonCode { code: "R44", reason: "Invalid Individual ID Number/Identification" },
    ReasonCode { code: "R45", reason: "Invalid Individual Name/Company Name" },
    ReasonCode { code: "R46", reason: "Invalid Representative Payee Indicator" },
    ReasonCode { code: "R47", reason: "Duplicate Enrollment" },
    ReasonCode { code: "R50", reason: "State Law Affecting RCK Acceptance" },
    ReasonCode { code: "R51", reason: "Item related to RCK Entry is Ineligible or RCK Entry is Improper" },
    ReasonCode { code: "R52", reason: "Stop Payment on Item Related to RCK Entry" },
    ReasonCode { code: "R53", reason: "Item and RCK Entry Presented for Payment" },
    ReasonCode { code: "R61", reason: "Misrouted Return" },
    ReasonCode { code: "R62", reason: "Return of Erroneous or Reversing Debit" },
    ReasonCode { code: "R67", reason: "Duplicate Return" },
    ReasonCode { code: "R68", reason: "Untimely Return" },
    ReasonCode { code: "R69", reason: "Field Error(s)" },
    ReasonCode { code: "R70", reason: "Permissible Return Entry Not Accepted/Return Not Requested by ODFI" },
    ReasonCode { code: "R71", reason: "Misrouted Dishonored Return" },
    ReasonCode { code: "R72", reason: "Untimely Dishonored Return" },
    ReasonCode { code: "R73", reason: "Timely Original Return" },
    ReasonCode { code: "R74", reason: "Corrected Return" },
    ReasonCode { code: "R75", reason: "Return Not a Duplicate" },
    ReasonCode { code: "R76", reason: "No Errors Found" },
    ReasonCode { code: "R77", reason: "Non-Acceptance of R62 Dishonored Return" },
    ReasonCode { code: "R80", reason: "IAT Entry Coding Error" },
    ReasonCode { code: "R81", reason: "Non-Participant in IAT Program" },
    ReasonCode { code: "R82", reason: "Invalid Foreign Receiving DFI Identification" },
    ReasonCode { code: "R83", reason: "Foreign Receiving DFI Unable to Settle" },
    ReasonCode { code: "R84", reason: "Entry Not Processed by Gateway" },
    ReasonCode { code: "R85", reason: "Incorrectly Coded Outbound International Payment" },
];

pub const CHANGE_CODES: &[ReasonCode] = &[
    ReasonCode { code: "C01", reason: "Incorrect bank account number" },
    ReasonCode { code: "C02", reason: "Incorrect transit/routing number" },
    ReasonCode { code: "C03", reason: "Incorrect transit/routing number and bank account number" },
    ReasonCode { code: "C04", reason: "Bank account name change" },
    ReasonCode { code: "C05", reason: "Incorrect payment code" },
    ReasonCode { code: "C06", reason: "Incorrect bank account number and transit code" },
    ReasonCode { code: "C07", reason: "Incorrect transit/routing number, bank account number and payment code" },
    ReasonCode { code: "C08", reason: "Incorrect Foreign Receiving DFI Identification" },
    ReasonCode { code: "C09", reason: "Incorrect Individual Identification Number" },
    ReasonCode { code: "C10", reason: "Incorrect Company Name" },
    ReasonCode { code: "C11", reason: "Incorrect Company Identification" },
    ReasonCode { code: "C12", reason: "Incorrect Company Name and Company ID" },
    ReasonCode { code: "C13", reason: "Addenda Format Error" },
    ReasonCode { code: "C14", reason: "Incorrect SEC Code for Outbound International Payment" },
];

/// Look up a return reason code (R01..R85)
pub fn lookup_return_code(code: &str) -> Option<&'static ReasonCode> {
    RETURN_CODES.iter().find(|r| r.code == code)
}

/// Look up a notification-of-change reason code (C01..C14)
pub fn lookup_change_code(code: &str) -> Option<&'static ReasonCode> {
    CHANGE_CODES.iter().find(|r| r.code == code)
}
