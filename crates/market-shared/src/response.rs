//! Standardized API response types (RFC 7807 compliant for errors).

use serde::{Deserialize, Serialize};

use crate::dto::ViolationDto;

/// One page of a collection resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u64,
    pub items_per_page: u64,
}

/// RFC 7807 Problem Details for HTTP APIs.
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Field-level failures for validation problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<ViolationDto>>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            violations: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_violations(mut self, violations: Vec<ViolationDto>) -> Self {
        self.violations = Some(violations);
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn unprocessable(violations: Vec<ViolationDto>) -> Self {
        let detail = violations
            .iter()
            .map(|v| format!("{}: {}", v.property_path, v.message))
            .collect::<Vec<_>>()
            .join("\n");

        Self::new(422, "Validation Failed")
            .with_detail(detail)
            .with_violations(violations)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}
