//! # Gateway Error Types
//!
//! Every failure a request can hit, from body decoding to row iteration.
//!
//! ## Error Categories
//!
//! - **Client faults** (400): malformed body, empty `sql`, unrecognized leading keyword
//! - **Oversized body** (413): request larger than `max_body_bytes`
//! - **Store faults** (500): preparation, binding/execution, internal worker failures
//!
//! Store messages are carried verbatim; whether they reach the caller is decided by
//! the response assembler (see `ResponseEnvelope::failure`).

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("{0}")]
    Decode(String),
    #[error("request body exceeds the {limit}-byte limit")]
    PayloadTooLarge { limit: usize },
    #[error("sql must not be empty")]
    EmptyQuery,
    #[error("Invalid SQL: unsupported statement `{keyword}`")]
    Rejected { keyword: String },
    #[error("{0}")]
    Prepare(String),
    #[error("{0}")]
    Execution(String),
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ if self.is_client_fault() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            GatewayError::Decode(_)
                | GatewayError::PayloadTooLarge { .. }
                | GatewayError::EmptyQuery
                | GatewayError::Rejected { .. }
        )
    }

    /// Short label used in logs and the `X-Query-Type` header.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Decode(_) => "decode",
            GatewayError::PayloadTooLarge { .. } => "too_large",
            GatewayError::EmptyQuery => "empty",
            GatewayError::Rejected { .. } => "rejected",
            GatewayError::Prepare(_) => "prepare",
            GatewayError::Execution(_) => "execution",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
