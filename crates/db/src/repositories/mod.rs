//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface over the database, wrapping every
//! mutation in one transaction and running the balance cascade before commit.

mod cascade;
mod fetch;
pub mod journal;
pub mod ledger;
pub mod petty_cash;
pub mod posting;

pub use journal::{JournalRepository, ReconcileResult};
pub use ledger::{AccountRef, JournalLine, LedgerDetail, LedgerRepository, PettyCashLine};
pub use petty_cash::{ApprovalResult, PettyCashDetail, PettyCashRepository};
pub use posting::{PostingDetailLine, PostingRepository, PostingView, PostingWithDetails};
