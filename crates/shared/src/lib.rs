//! Shared types, errors, and configuration for Ledgerline.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Amount rounding and balance tolerance helpers
//! - The tagged response envelope returned by every operation
//! - Configuration management and tracing initialisation

pub mod config;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use types::{ApiResponse, ResponseStatus};
