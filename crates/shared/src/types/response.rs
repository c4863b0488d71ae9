//! Tagged response envelope.
//!
//! Every public operation answers with `{status, message, data?}`. Failures
//! additionally carry a machine-readable `error_code` and the protocol status
//! a transport layer would use.

use serde::{Deserialize, Serialize};

/// Outcome tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The operation completed.
    Success,
    /// The operation failed and nothing was written.
    Error,
}

/// Response envelope returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Outcome tag.
    pub status: ResponseStatus,
    /// Human readable message.
    pub message: String,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine readable error code, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Suggested protocol status code, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Builds a success response carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
            error_code: None,
            status_code: None,
        }
    }

    /// Builds an error response with a domain-specific code.
    pub fn failure(
        message: impl Into<String>,
        error_code: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
            error_code: Some(error_code.into()),
            status_code: Some(status_code),
        }
    }

    /// Returns true for a success response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
