//! SQL gateway core
//!
//! Turns a decoded request into a response envelope:
//!
//! 1. [`classifier`] assigns the statement a [`Category`] from its leading keyword
//! 2. [`executor`] prepares, binds and runs it against the [`Store`]
//! 3. [`value_codec`] converts bind arguments in and result cells out
//! 4. [`envelope`] wraps the outcome or the failure for the transport
//!
//! Nothing here knows about HTTP beyond the numeric status hint.

pub mod classifier;
pub mod envelope;
pub mod errors;
pub mod executor;
pub mod store;
pub mod value_codec;

pub use classifier::{classify, Category};
pub use envelope::{ErrorDescriptor, Payload, ResponseEnvelope};
pub use errors::GatewayError;
pub use executor::{ExecutionOutcome, Executor, MutationSummary};
pub use store::Store;
pub use value_codec::{Row, SqlValue};

/// SQL text plus its positional bind arguments, for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Build a statement from raw request fields. Empty SQL is a client fault.
    pub fn from_parts(sql: String, args: Vec<serde_json::Value>) -> Result<Self, GatewayError> {
        if sql.is_empty() {
            return Err(GatewayError::EmptyQuery);
        }
        let args = value_codec::decode_args(args)?;
        Ok(Self { sql, args })
    }

    pub fn category(&self) -> Category {
        classify(&self.sql)
    }

    pub fn keyword(&self) -> String {
        classifier::leading_keyword(&self.sql)
    }
}

/// Classify and execute in one step. Blocking.
pub fn run_statement(
    executor: &Executor,
    statement: &Statement,
) -> Result<ExecutionOutcome, GatewayError> {
    executor.execute(statement, statement.category())
}
