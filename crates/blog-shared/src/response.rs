//! Standardized API error body, shaped after RFC 7807 Problem Details.

use serde::{Deserialize, Serialize};

/// Error body returned for every failed request.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "Bad Request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "Not Found", message)
    }

    pub fn internal_error() -> Self {
        Self::new(
            500,
            "Internal Server Error",
            "Something went wrong while handling the request",
        )
    }
}
