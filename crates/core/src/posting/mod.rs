//! Posting engine.
//!
//! Freezes a ledger into an immutable [`Posting`] with one [`PostingDetail`]
//! per journal line, and reverses a whole period at once.

pub mod report;
pub mod service;
pub mod types;

pub use report::{PostingReport, PostingRow, ReportSummary, build_report};
pub use service::{
    check_postable, create_posting, ensure_editable, period_of, state_of, unpost, validate_period,
};
pub use types::{
    NewPosting, NewPostingDetail, Posting, PostingDetail, PostingFilter, PostingState,
    UnpostSummary,
};
