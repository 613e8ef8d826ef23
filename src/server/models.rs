use serde::Deserialize;
use serde_json::Value;

use crate::gateway::{GatewayError, Statement};

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    /// SQL text; a missing field decodes as empty and is rejected later
    #[serde(default)]
    pub sql: String,
    /// Positional bind arguments; `null` or missing means none
    #[serde(default)]
    pub args: Option<Vec<Value>>,
}

impl QueryRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, GatewayError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn into_statement(self) -> Result<Statement, GatewayError> {
        Statement::from_parts(self.sql, self.args.unwrap_or_default())
    }
}
