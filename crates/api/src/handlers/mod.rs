//! Operation handlers, grouped by subsystem.

pub mod journals;
pub mod ledgers;
pub mod petty_cash;
pub mod postings;

pub use ledgers::UpdateAggregateRequest;
pub use postings::UnpostMonthRequest;
