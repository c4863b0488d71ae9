//! Ledger store logic.
//!
//! This module implements the per-date aggregate side of the engine:
//! - The `Ledger` record and its aggregate update rule
//! - The global `TimelineIndex` used to seed running balances
//! - Transaction code generation
//! - Monthly recapitulation over posted ledgers

pub mod code;
pub mod recap;
pub mod timeline;
pub mod types;

pub use code::{draw_codes, random_code, unique_code};
pub use recap::{MonthlyRecap, RecapDay, RecapSummary, build_recap, month_bounds};
pub use timeline::TimelineIndex;
pub use types::{CreateLedgerInput, Ledger, LedgerPatch};
