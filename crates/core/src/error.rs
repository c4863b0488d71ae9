//! Error types shared by every ledger operation.
//!
//! Each variant belongs to exactly one [`ErrorKind`]. The kind decides the
//! protocol status a transport would use and whether the caller may retry.

use chrono::NaiveDate;
use ledgerline_shared::types::{
    AccountId, JournalEntryId, LedgerId, PettyCashId, PostingId, UserId,
};
use thiserror::Error;

/// Result alias for core operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any state was read.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The record exists but its state forbids the operation.
    Conflict,
    /// The store was busy. Retrying may succeed.
    Transient,
    /// Stored data breaks a ledger invariant.
    Integrity,
}

/// Errors that can occur during ledger, journal, petty cash and posting operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A required field was absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A date field could not be parsed.
    #[error("Invalid date for {field}: {value}")]
    InvalidDate {
        /// Field name.
        field: &'static str,
        /// Raw input.
        value: String,
    },

    /// Debit and credit were both nonzero.
    #[error("Only one of debit or credit should have non-zero value in each entry")]
    DebitAndCredit,

    /// An amount was negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Month outside 1..=12 or an unrepresentable year.
    #[error("Invalid year or month input: {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// A batch operation received no items.
    #[error("Batch must contain at least one entry")]
    EmptyBatch,

    /// An update carried no fields.
    #[error("No fields to update")]
    EmptyUpdate,

    /// The same entry appeared twice in one batch.
    #[error("Entry {0} appears more than once in the batch")]
    DuplicateEntry(JournalEntryId),

    /// A running balance or total left the representable range.
    #[error("Balance exceeds the representable range")]
    BalanceOverflow,

    // ========== Not Found Errors ==========
    /// Ledger not found.
    #[error("General Ledger not found: {0}")]
    LedgerNotFound(LedgerId),

    /// Journal entry not found.
    #[error("General Journal entry not found: {0}")]
    JournalEntryNotFound(JournalEntryId),

    /// Petty cash entry not found.
    #[error("Petty cash record not found: {0}")]
    PettyCashNotFound(PettyCashId),

    /// Posting not found.
    #[error("Posting not found: {0}")]
    PostingNotFound(PostingId),

    /// Account not present in the account directory.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// User not present in the user directory.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The ledger has no journal lines to post.
    #[error("No journal entries found for this ledger: {0}")]
    NoJournalEntries(LedgerId),

    /// No ledger has journal activity on the date.
    #[error("No ledger found for approved date: {0}")]
    NoLedgerForDate(NaiveDate),

    /// No active postings exist for the period.
    #[error("No postings found for the specified month and year: {month}/{year}")]
    NoPostingsForPeriod {
        /// Period month.
        month: u32,
        /// Period year.
        year: i32,
    },

    // ========== Conflict Errors ==========
    /// Posting was requested for a ledger that is already posted.
    #[error("Ledger not found or already posted: {0}")]
    AlreadyPosted(LedgerId),

    /// A mutation would change a posted ledger.
    #[error("Ledger {0} is posted and cannot be modified")]
    LedgerPosted(LedgerId),

    /// Approval was requested twice.
    #[error("Petty cash record is already approved: {0}")]
    AlreadyApproved(PettyCashId),

    /// Approved petty cash rows are immutable.
    #[error("Petty cash record {0} is approved and cannot be modified")]
    PettyCashApproved(PettyCashId),

    /// The ledger has posting history and cannot be deleted.
    #[error("Ledger {0} has posting history and cannot be deleted")]
    LedgerHasPostings(LedgerId),

    // ========== Transient Errors ==========
    /// The store did not become available in time.
    #[error("Store is busy, transaction could not be started")]
    StoreBusy,

    /// Every generated transaction code was already taken.
    #[error("Could not generate a unique transaction code after {0} attempts")]
    TransactionCodeExhausted(u32),

    // ========== Integrity Errors ==========
    /// Stored ledger data breaks the running balance chain.
    #[error("Integrity violation in ledger {ledger_id}: {detail}")]
    BrokenChain {
        /// Ledger being recomputed.
        ledger_id: LedgerId,
        /// What was found.
        detail: String,
    },

    /// The database rejected a statement for a reason other than contention.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::InvalidDate { .. }
            | Self::DebitAndCredit
            | Self::NegativeAmount(_)
            | Self::InvalidPeriod { .. }
            | Self::EmptyBatch
            | Self::EmptyUpdate
            | Self::DuplicateEntry(_)
            | Self::BalanceOverflow => ErrorKind::Validation,

            Self::LedgerNotFound(_)
            | Self::JournalEntryNotFound(_)
            | Self::PettyCashNotFound(_)
            | Self::PostingNotFound(_)
            | Self::AccountNotFound(_)
            | Self::UserNotFound(_)
            | Self::NoJournalEntries(_)
            | Self::NoLedgerForDate(_)
            | Self::NoPostingsForPeriod { .. } => ErrorKind::NotFound,

            Self::AlreadyPosted(_)
            | Self::LedgerPosted(_)
            | Self::AlreadyApproved(_)
            | Self::PettyCashApproved(_)
            | Self::LedgerHasPostings(_) => ErrorKind::Conflict,

            Self::StoreBusy | Self::TransactionCodeExhausted(_) => ErrorKind::Transient,

            Self::BrokenChain { .. } | Self::Storage(_) => ErrorKind::Integrity,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::DebitAndCredit => "DEBIT_AND_CREDIT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            Self::BalanceOverflow => "BALANCE_OVERFLOW",
            Self::LedgerNotFound(_) => "LEDGER_NOT_FOUND",
            Self::JournalEntryNotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::PettyCashNotFound(_) => "PETTY_CASH_NOT_FOUND",
            Self::PostingNotFound(_) => "POSTING_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::NoJournalEntries(_) => "NO_JOURNAL_ENTRIES",
            Self::NoLedgerForDate(_) => "NO_LEDGER_FOR_DATE",
            Self::NoPostingsForPeriod { .. } => "NO_POSTINGS_FOR_PERIOD",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::LedgerPosted(_) => "LEDGER_POSTED",
            Self::AlreadyApproved(_) => "ALREADY_APPROVED",
            Self::PettyCashApproved(_) => "PETTY_CASH_APPROVED",
            Self::LedgerHasPostings(_) => "LEDGER_HAS_POSTINGS",
            Self::StoreBusy => "STORE_BUSY",
            Self::TransactionCodeExhausted(_) => "TRANSACTION_CODE_EXHAUSTED",
            Self::BrokenChain { .. } => "BROKEN_CHAIN",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Transient => 503,
            ErrorKind::Integrity => 500,
        }
    }

    /// Returns true if the error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
