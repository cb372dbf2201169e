use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical accounting fields every export is mapped onto.
///
/// The set is fixed: a mapping session assigns each source column to at
/// most one of these codes, and each code to at most one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCode {
    /// Unique identifier of a journal entry (groups its lines).
    JournalEntryId,
    /// Sequential line number within an entry.
    LineNumber,
    /// Header-level description of the entry.
    Description,
    /// Line-level description.
    LineDescription,
    /// Effective posting date of the entry.
    PostingDate,
    /// Fiscal year of the accounting period.
    FiscalYear,
    /// Accounting period (month) number.
    PeriodNumber,
    /// General-ledger account code.
    GlAccountNumber,
    /// General-ledger account name.
    GlAccountName,
    /// Signed monetary amount of the line.
    Amount,
    /// Debit-side amount.
    DebitAmount,
    /// Credit-side amount.
    CreditAmount,
    /// Debit/credit marker (e.g. "D"/"H", "S"/"H").
    DebitCreditIndicator,
    /// User who prepared the entry.
    PreparedBy,
    /// Date the entry was captured in the source system.
    EntryDate,
    /// Time the entry was captured in the source system.
    EntryTime,
    /// Vendor or third-party identifier.
    VendorId,
    /// Reference document number.
    DocumentNumber,
}

impl FieldCode {
    /// All canonical codes, in catalog order.
    pub const ALL: [FieldCode; 18] = [
        FieldCode::JournalEntryId,
        FieldCode::LineNumber,
        FieldCode::Description,
        FieldCode::LineDescription,
        FieldCode::PostingDate,
        FieldCode::FiscalYear,
        FieldCode::PeriodNumber,
        FieldCode::GlAccountNumber,
        FieldCode::GlAccountName,
        FieldCode::Amount,
        FieldCode::DebitAmount,
        FieldCode::CreditAmount,
        FieldCode::DebitCreditIndicator,
        FieldCode::PreparedBy,
        FieldCode::EntryDate,
        FieldCode::EntryTime,
        FieldCode::VendorId,
        FieldCode::DocumentNumber,
    ];

    /// Returns the snake_case code as it appears in configuration and output files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCode::JournalEntryId => "journal_entry_id",
            FieldCode::LineNumber => "line_number",
            FieldCode::Description => "description",
            FieldCode::LineDescription => "line_description",
            FieldCode::PostingDate => "posting_date",
            FieldCode::FiscalYear => "fiscal_year",
            FieldCode::PeriodNumber => "period_number",
            FieldCode::GlAccountNumber => "gl_account_number",
            FieldCode::GlAccountName => "gl_account_name",
            FieldCode::Amount => "amount",
            FieldCode::DebitAmount => "debit_amount",
            FieldCode::CreditAmount => "credit_amount",
            FieldCode::DebitCreditIndicator => "debit_credit_indicator",
            FieldCode::PreparedBy => "prepared_by",
            FieldCode::EntryDate => "entry_date",
            FieldCode::EntryTime => "entry_time",
            FieldCode::VendorId => "vendor_id",
            FieldCode::DocumentNumber => "document_number",
        }
    }

    /// Returns true for the amount-family codes used by balance validation.
    pub fn is_amount_family(&self) -> bool {
        matches!(
            self,
            FieldCode::Amount | FieldCode::DebitAmount | FieldCode::CreditAmount
        )
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        FieldCode::ALL
            .iter()
            .find(|code| code.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown canonical field: {}", s))
    }
}

/// Broad data kind of a canonical field, used to sanity-check mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Text,
    Numeric,
    Date,
    Alphanumeric,
    Currency,
}
