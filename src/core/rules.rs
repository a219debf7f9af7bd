//! SEC code rule tables
//!
//! Each standard entry class code selects one [`SecRules`] row. The rows are
//! data: allowed polarity and transaction codes, which addenda a forward entry
//! may carry, amount limits and SEC-specific mandatory fields. Adding a SEC
//! code means adding a row, not a code path.
//!
//! [`SecRules::check_entry`] applies a row to one entry and returns the first
//! violation.

use crate::record::field::{is_valid_mmyy, require_present};
use crate::record::{BatchHeader, Category, EntryDetail};
use crate::types::codes::Direction;
use crate::types::{BatchError, BatchErrorKind, FieldError, FieldErrorKind, SecCode};

/// Which transaction directions a batch accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Mixed,
    DebitOnly,
    CreditOnly,
}

/// Addenda a forward entry may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardAddenda {
    /// No forward addenda at all
    Forbidden,
    /// Up to `max` Addenda05
    Optional05 { max: usize },
    /// Between `min` and `max` Addenda05
    Required05 { min: usize, max: usize },
    /// Up to `max` Addenda05, matching the count declared in the entry
    Counted05 { max: usize },
    /// Exactly one Addenda02 and no Addenda05
    Required02,
}

/// SEC-specific slices of overloaded entry fields that must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    CheckSerialNumber,
    PopCheckSerialNumber,
    PopTerminalCity,
    PopTerminalState,
    ProcessControlField,
    ItemResearchNumber,
    /// Receiving company name for CTX/TRX/ATX/ENR style entries
    ReceivingCompany,
    IndividualName,
    /// POS, SHR and MTE card transaction type
    CardTransactionType,
    /// SHR card expiration date, MMYY
    CardExpirationDate,
    /// SHR document reference number
    DocumentReferenceNumber,
    /// SHR individual card account number
    CardAccountNumber,
    /// WEB payment type: R recurring, S single
    WebPaymentType,
    /// TEL payment type: R, S or blank
    TelPaymentType,
}

/// Valid POS/SHR/MTE card transaction type codes
const CARD_TRANSACTION_TYPES: [&str; 6] = ["01", "02", "03", "04", "05", "06"];

/// The rule row for one SEC code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecRules {
    pub sec: SecCode,
    pub polarity: Polarity,
    /// When set, the only transaction codes an entry may use
    pub transaction_codes: Option<&'static [u8]>,
    pub forward_addenda: ForwardAddenda,
    /// Per-entry ceiling in cents
    pub max_amount: Option<u64>,
    /// Every entry must carry a zero amount
    pub zero_amount: bool,
    pub required_fields: &'static [EntryField],
    /// Required company entry description on the batch header
    pub entry_description: Option<&'static str>,
    /// Addenda05 payment information that starts with `TXP*` is validated as a TXP segment
    pub txp: bool,
    /// Entry categories the batch may contain
    pub categories: &'static [Category],
}

const ALL_CATEGORIES: &[Category] = &[Category::Forward, Category::Return, Category::Noc];
const CHECK_LIMIT: u64 = 2_500_000;
const NOC_CODES: &[u8] = &[21, 26, 31, 36, 41, 46, 51, 56];
const ZERO_DOLLAR_CREDIT_CODES: &[u8] = &[24, 34];

const BASE: SecRules = SecRules {
    sec: SecCode::Ppd,
    polarity: Polarity::Mixed,
    transaction_codes: None,
    forward_addenda: ForwardAddenda::Optional05 { max: 1 },
    max_amount: None,
    zero_amount: false,
    required_fields: &[],
    entry_description: None,
    txp: false,
    categories: ALL_CATEGORIES,
};

/// One row per SEC code carried by a standard batch
///
/// IAT and ADV have their own layouts and batch types and no row here.
pub const RULES: &[SecRules] = &[
    SecRules {
        sec: SecCode::Ack,
        transaction_codes: Some(ZERO_DOLLAR_CREDIT_CODES),
        zero_amount: true,
        required_fields: &[EntryField::ReceivingCompany],
        ..BASE
    },
    SecRules {
        sec: SecCode::Arc,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        max_amount: Some(CHECK_LIMIT),
        required_fields: &[EntryField::CheckSerialNumber],
        ..BASE
    },
    SecRules {
        sec: SecCode::Atx,
        transaction_codes: Some(ZERO_DOLLAR_CREDIT_CODES),
        forward_addenda: ForwardAddenda::Counted05 { max: 2 },
        zero_amount: true,
        required_fields: &[EntryField::ReceivingCompany],
        ..BASE
    },
    SecRules {
        sec: SecCode::Boc,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        max_amount: Some(CHECK_LIMIT),
        required_fields: &[EntryField::CheckSerialNumber],
        ..BASE
    },
    SecRules {
        sec: SecCode::Ccd,
        txp: true,
        ..BASE
    },
    SecRules {
        sec: SecCode::Cie,
        polarity: Polarity::CreditOnly,
        required_fields: &[EntryField::IndividualName],
        ..BASE
    },
    SecRules {
        sec: SecCode::Cor,
        transaction_codes: Some(NOC_CODES),
        forward_addenda: ForwardAddenda::Forbidden,
        zero_amount: true,
        categories: &[Category::Noc],
        ..BASE
    },
    SecRules {
        sec: SecCode::Ctx,
        forward_addenda: ForwardAddenda::Counted05 { max: 9999 },
        required_fields: &[EntryField::ReceivingCompany],
        ..BASE
    },
    SecRules {
        sec: SecCode::Dne,
        transaction_codes: Some(&[21, 23, 31, 33]),
        forward_addenda: ForwardAddenda::Required05 { min: 1, max: 1 },
        zero_amount: true,
        ..BASE
    },
    SecRules {
        sec: SecCode::Enr,
        transaction_codes: Some(&[23, 33]),
        forward_addenda: ForwardAddenda::Required05 { min: 1, max: 9999 },
        zero_amount: true,
        ..BASE
    },
    SecRules {
        sec: SecCode::Mte,
        forward_addenda: ForwardAddenda::Required02,
        required_fields: &[EntryField::IndividualName],
        ..BASE
    },
    SecRules {
        sec: SecCode::Pop,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        max_amount: Some(CHECK_LIMIT),
        required_fields: &[
            EntryField::PopCheckSerialNumber,
            EntryField::PopTerminalCity,
            EntryField::PopTerminalState,
        ],
        ..BASE
    },
    SecRules {
        sec: SecCode::Pos,
        forward_addenda: ForwardAddenda::Required02,
        required_fields: &[EntryField::CardTransactionType],
        ..BASE
    },
    SecRules {
        sec: SecCode::Ppd,
        ..BASE
    },
    SecRules {
        sec: SecCode::Rck,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        max_amount: Some(CHECK_LIMIT),
        required_fields: &[EntryField::CheckSerialNumber],
        entry_description: Some("REDEPCHECK"),
        ..BASE
    },
    SecRules {
        sec: SecCode::Shr,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Required02,
        required_fields: &[
            EntryField::CardTransactionType,
            EntryField::CardExpirationDate,
            EntryField::DocumentReferenceNumber,
            EntryField::CardAccountNumber,
        ],
        ..BASE
    },
    SecRules {
        sec: SecCode::Tel,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        required_fields: &[EntryField::TelPaymentType],
        ..BASE
    },
    SecRules {
        sec: SecCode::Trc,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        required_fields: &[
            EntryField::CheckSerialNumber,
            EntryField::ProcessControlField,
            EntryField::ItemResearchNumber,
        ],
        ..BASE
    },
    SecRules {
        sec: SecCode::Trx,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Counted05 { max: 9999 },
        required_fields: &[EntryField::ReceivingCompany],
        ..BASE
    },
    SecRules {
        sec: SecCode::Web,
        required_fields: &[EntryField::WebPaymentType],
        ..BASE
    },
    SecRules {
        sec: SecCode::Xck,
        polarity: Polarity::DebitOnly,
        forward_addenda: ForwardAddenda::Forbidden,
        max_amount: Some(CHECK_LIMIT),
        required_fields: &[
            EntryField::CheckSerialNumber,
            EntryField::ProcessControlField,
            EntryField::ItemResearchNumber,
        ],
        ..BASE
    },
];

/// Batch number and SEC code used to scope errors to a batch
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub batch_number: u32,
    pub sec: &'a str,
}

impl<'a> Scope<'a> {
    pub fn of(header: &'a BatchHeader) -> Self {
        Scope {
            batch_number: header.batch_number,
            sec: &header.standard_entry_class_code,
        }
    }

    pub fn error(&self, field_name: &str, kind: BatchErrorKind) -> BatchError {
        BatchError::new(self.batch_number, self.sec, field_name, kind)
    }

    pub fn field(&self, error: FieldError) -> BatchError {
        BatchError::from_field(self.batch_number, self.sec, error)
    }
}

impl SecRules {
    /// The row for `sec`, `None` for IAT and ADV
    pub fn for_sec(sec: SecCode) -> Option<&'static SecRules> {
        RULES.iter().find(|rules| rules.sec == sec)
    }

    /// Header-level rules that do not depend on entries
    pub fn check_header(&self, header: &BatchHeader) -> Result<(), BatchError> {
        let scope = Scope::of(header);
        if let Some(expected) = self.entry_description {
            if header.company_entry_description != expected {
                return Err(scope.field(FieldError::new(
                    "CompanyEntryDescription",
                    &header.company_entry_description,
                    FieldErrorKind::Mismatch {
                        expected: expected.to_string(),
                    },
                )));
            }
        }
        Ok(())
    }

    /// Apply the row to one entry
    pub fn check_entry(&self, scope: Scope<'_>, entry: &EntryDetail) -> Result<(), BatchError> {
        if !self.categories.contains(&entry.category) {
            return Err(scope.error(
                "Category",
                BatchErrorKind::Category {
                    category: entry.category.to_string(),
                },
            ));
        }
        self.check_addenda(scope, entry)?;
        if entry.category != Category::Noc {
            self.check_polarity(scope, entry)?;
        }
        if let Some(codes) = self.transaction_codes {
            if !codes.contains(&entry.transaction_code) {
                return Err(scope.error(
                    "TransactionCode",
                    BatchErrorKind::TransactionCode {
                        code: entry.transaction_code,
                    },
                ));
            }
        }
        if (self.zero_amount || entry.is_prenote()) && entry.amount != 0 {
            return Err(scope.error("Amount", BatchErrorKind::ZeroAmount { got: entry.amount }));
        }
        if let Some(max) = self.max_amount {
            if entry.amount > max {
                return Err(scope.error(
                    "Amount",
                    BatchErrorKind::Amount {
                        got: entry.amount,
                        max,
                    },
                ));
            }
        }
        if entry.category == Category::Forward {
            for field in self.required_fields {
                check_field(*field, entry).map_err(|e| scope.field(e))?;
            }
        }
        if self.txp {
            for addenda in entry.addenda05.iter().filter(|a| a.is_txp()) {
                let txp = addenda.txp();
                match entry.validation() {
                    Some(opts) => txp.validate_with(opts),
                    None => txp.validate(),
                }
                .map_err(|e| scope.field(e))?;
            }
        }
        Ok(())
    }

    fn check_polarity(&self, scope: Scope<'_>, entry: &EntryDetail) -> Result<(), BatchError> {
        let code = entry.transaction_code;
        match (self.polarity, entry.credit_or_debit()) {
            (Polarity::DebitOnly, Some(Direction::Debit)) => Ok(()),
            (Polarity::DebitOnly, _) => Err(scope.error(
                "TransactionCode",
                BatchErrorKind::DebitOnly { code },
            )),
            (Polarity::CreditOnly, Some(Direction::Credit)) => Ok(()),
            (Polarity::CreditOnly, _) => Err(scope.error(
                "TransactionCode",
                BatchErrorKind::CreditOnly { code },
            )),
            (Polarity::Mixed, _) => Ok(()),
        }
    }

    fn check_addenda(&self, scope: Scope<'_>, entry: &EntryDetail) -> Result<(), BatchError> {
        let category = entry.category.to_string();
        let not_allowed = |type_code: &str| {
            scope.error(
                "Addenda",
                BatchErrorKind::AddendaCategory {
                    category: category.clone(),
                    type_code: type_code.to_string(),
                },
            )
        };
        let required = |type_code: &str| {
            scope.error(
                "Addenda",
                BatchErrorKind::AddendaRequired {
                    category: category.clone(),
                    type_code: type_code.to_string(),
                },
            )
        };
        match entry.category {
            Category::Return => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if !entry.addenda05.is_empty() {
                    return Err(not_allowed("05"));
                }
                if entry.addenda98.is_some() {
                    return Err(not_allowed("98"));
                }
                if entry.addenda99.is_none() {
                    return Err(required("99"));
                }
                Ok(())
            }
            Category::Noc => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if !entry.addenda05.is_empty() {
                    return Err(not_allowed("05"));
                }
                if entry.addenda99.is_some() {
                    return Err(not_allowed("99"));
                }
                if entry.addenda98.is_none() {
                    return Err(required("98"));
                }
                Ok(())
            }
            Category::Forward => {
                if entry.addenda98.is_some() {
                    return Err(not_allowed("98"));
                }
                if entry.addenda99.is_some() {
                    return Err(not_allowed("99"));
                }
                self.check_forward_addenda(scope, entry, not_allowed, required)
            }
        }
    }

    fn check_forward_addenda(
        &self,
        scope: Scope<'_>,
        entry: &EntryDetail,
        not_allowed: impl Fn(&str) -> BatchError,
        required: impl Fn(&str) -> BatchError,
    ) -> Result<(), BatchError> {
        let count = entry.addenda05.len();
        let too_many = |max: usize| {
            scope.error("Addenda05", BatchErrorKind::AddendaCount { got: count, max })
        };
        match self.forward_addenda {
            ForwardAddenda::Forbidden => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if count > 0 {
                    return Err(not_allowed("05"));
                }
            }
            ForwardAddenda::Optional05 { max } => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if count > max {
                    return Err(too_many(max));
                }
            }
            ForwardAddenda::Required05 { min, max } => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if count < min {
                    return Err(required("05"));
                }
                if count > max {
                    return Err(too_many(max));
                }
            }
            ForwardAddenda::Counted05 { max } => {
                if entry.addenda02.is_some() {
                    return Err(not_allowed("02"));
                }
                if count > max {
                    return Err(too_many(max));
                }
                let declared = entry.catx_addenda_records();
                if usize::try_from(declared).ok() != Some(count) {
                    return Err(scope.field(FieldError::new(
                        "AddendaRecords",
                        declared,
                        FieldErrorKind::Mismatch {
                            expected: count.to_string(),
                        },
                    )));
                }
            }
            ForwardAddenda::Required02 => {
                if count > 0 {
                    return Err(not_allowed("05"));
                }
                if entry.addenda02.is_none() {
                    return Err(required("02"));
                }
            }
        }
        Ok(())
    }
}

fn check_field(field: EntryField, entry: &EntryDetail) -> Result<(), FieldError> {
    match field {
        EntryField::CheckSerialNumber => {
            require_present("CheckSerialNumber", &entry.check_serial_number())
        }
        EntryField::PopCheckSerialNumber => {
            require_present("CheckSerialNumber", &entry.pop_check_serial_number())
        }
        EntryField::PopTerminalCity => {
            require_present("TerminalCity", &entry.pop_terminal_city())
        }
        EntryField::PopTerminalState => {
            require_present("TerminalState", &entry.pop_terminal_state())
        }
        EntryField::ProcessControlField => {
            require_present("ProcessControlField", &entry.process_control_field())
        }
        EntryField::ItemResearchNumber => {
            require_present("ItemResearchNumber", &entry.item_research_number())
        }
        EntryField::ReceivingCompany => {
            require_present("ReceivingCompany", &entry.catx_receiving_company())
        }
        EntryField::IndividualName => require_present("IndividualName", &entry.individual_name),
        EntryField::CardTransactionType => {
            let value = entry.card_transaction_type();
            if CARD_TRANSACTION_TYPES.contains(&value.as_str()) {
                Ok(())
            } else {
                Err(FieldError::new(
                    "CardTransactionType",
                    value,
                    FieldErrorKind::CardTransactionType,
                ))
            }
        }
        EntryField::CardExpirationDate => {
            let value = entry.shr_card_expiration_date();
            if is_valid_mmyy(&value) {
                Ok(())
            } else {
                Err(FieldError::new(
                    "CardExpirationDate",
                    value,
                    FieldErrorKind::InvalidDate,
                ))
            }
        }
        EntryField::DocumentReferenceNumber => require_present(
            "DocumentReferenceNumber",
            &entry.shr_document_reference_number(),
        ),
        EntryField::CardAccountNumber => require_present(
            "IndividualCardAccountNumber",
            &entry.shr_individual_card_account_number(),
        ),
        EntryField::WebPaymentType => payment_type(entry, &["R", "S"]),
        EntryField::TelPaymentType => payment_type(entry, &["R", "S", ""]),
    }
}

fn payment_type(entry: &EntryDetail, allowed: &[&str]) -> Result<(), FieldError> {
    let value = entry.payment_type_code();
    if allowed.contains(&value.as_str()) {
        Ok(())
    } else {
        Err(FieldError::new(
            "PaymentTypeCode",
            value,
            FieldErrorKind::PaymentType,
        ))
    }
}
