//! Response Assembler
//!
//! Pure mapping from an execution result to the JSON envelope every endpoint
//! returns. Exactly one of `data`/`error` is set; `ok` mirrors which.

use axum::http::StatusCode;
use serde::Serialize;

use super::errors::GatewayError;
use super::executor::{ExecutionOutcome, MutationSummary};
use super::value_codec::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query_type")]
pub enum Payload {
    #[serde(rename = "select")]
    Select { data: Vec<Row> },
    #[serde(rename = "exec")]
    Exec {
        last_insert_id: i64,
        rows_affected: i64,
    },
}

impl From<ExecutionOutcome> for Payload {
    fn from(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Rows(data) => Payload::Select { data },
            ExecutionOutcome::Mutation(MutationSummary {
                last_insert_id,
                rows_affected,
            }) => Payload::Exec {
                last_insert_id,
                rows_affected,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDescriptor {
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
    pub ok: bool,
}

impl ResponseEnvelope {
    pub fn success(outcome: ExecutionOutcome) -> Self {
        Self {
            data: Some(outcome.into()),
            error: None,
            ok: true,
        }
    }

    /// With `verbose` off, store-side messages are replaced by a generic
    /// description. Client-fault messages are always returned as-is.
    pub fn failure(err: &GatewayError, verbose: bool) -> Self {
        let message = match err {
            _ if verbose || err.is_client_fault() => err.to_string(),
            GatewayError::Prepare(_) => "statement could not be prepared".to_string(),
            GatewayError::Execution(_) => "statement execution failed".to_string(),
            _ => "internal server error".to_string(),
        };

        Self {
            data: None,
            error: Some(ErrorDescriptor {
                message,
                code: err.status_code().as_u16(),
            }),
            ok: false,
        }
    }

    pub fn assemble(result: Result<ExecutionOutcome, GatewayError>, verbose: bool) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome),
            Err(err) => Self::failure(&err, verbose),
        }
    }

    /// Liveness response: no payload, no error.
    pub fn ping() -> Self {
        Self {
            data: None,
            error: None,
            ok: true,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.error
            .as_ref()
            .and_then(|e| StatusCode::from_u16(e.code).ok())
            .unwrap_or(StatusCode::OK)
    }
}
