//! Common types used across the application.

pub mod id;
pub mod money;
pub mod response;

pub use id::*;
pub use money::{BALANCE_TOLERANCE, is_balanced, round_amount};
pub use response::{ApiResponse, ResponseStatus};
