//! Statement execution against the store.
//!
//! `execute` is blocking; async callers should hop onto the blocking pool.

use std::time::Instant;

use rusqlite::{params_from_iter, types::Value as StoreValue, Connection};

use super::classifier::Category;
use super::errors::GatewayError;
use super::store::Store;
use super::value_codec::{Row, SqlValue};
use super::Statement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub last_insert_id: i64,
    pub rows_affected: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Rows(Vec<Row>),
    Mutation(MutationSummary),
}

impl ExecutionOutcome {
    pub fn category(&self) -> Category {
        match self {
            ExecutionOutcome::Rows(_) => Category::Read,
            ExecutionOutcome::Mutation(_) => Category::Write,
        }
    }

    /// Rows returned for reads, rows affected for writes.
    pub fn row_count(&self) -> i64 {
        match self {
            ExecutionOutcome::Rows(rows) => rows.len() as i64,
            ExecutionOutcome::Mutation(summary) => summary.rows_affected,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Executor {
    store: Store,
}

impl Executor {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn execute(
        &self,
        statement: &Statement,
        category: Category,
    ) -> Result<ExecutionOutcome, GatewayError> {
        if category == Category::Rejected {
            return Err(GatewayError::Rejected {
                keyword: statement.keyword(),
            });
        }

        let started = Instant::now();
        let outcome = self.store.with_connection(|conn| match category {
            Category::Read => query_rows(conn, statement).map(ExecutionOutcome::Rows),
            _ => execute_mutation(conn, statement).map(ExecutionOutcome::Mutation),
        });

        log::debug!(
            "Executed {} statement in {:.3}ms (ok={})",
            category,
            started.elapsed().as_secs_f64() * 1000.0,
            outcome.is_ok()
        );
        outcome
    }
}

fn bind_values(statement: &Statement) -> Vec<StoreValue> {
    statement.args.iter().cloned().map(StoreValue::from).collect()
}

fn query_rows(conn: &Connection, statement: &Statement) -> Result<Vec<Row>, GatewayError> {
    let mut stmt = conn
        .prepare(&statement.sql)
        .map_err(|e| GatewayError::Prepare(e.to_string()))?;

    let columns: Vec<(String, Option<String>)> = stmt
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), column.decl_type().map(String::from)))
        .collect();

    let values = bind_values(statement);
    let mut rows = stmt
        .query(params_from_iter(values.iter()))
        .map_err(|e| GatewayError::Execution(e.to_string()))?;

    let mut result = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| GatewayError::Execution(e.to_string()))?
    {
        let mut materialized = Row::with_capacity(columns.len());
        for (idx, (name, decl_type)) in columns.iter().enumerate() {
            let cell = row
                .get_ref(idx)
                .map_err(|e| GatewayError::Execution(e.to_string()))?;
            materialized.insert(name.as_str(), SqlValue::from_column(cell, decl_type.as_deref()));
        }
        result.push(materialized);
    }

    Ok(result)
}

fn execute_mutation(
    conn: &Connection,
    statement: &Statement,
) -> Result<MutationSummary, GatewayError> {
    let mut stmt = conn
        .prepare(&statement.sql)
        .map_err(|e| GatewayError::Prepare(e.to_string()))?;

    let values = bind_values(statement);
    let affected = if stmt.column_count() > 0 {
        // `... RETURNING` yields rows; step it to completion and discard them.
        let mut rows = stmt
            .query(params_from_iter(values.iter()))
            .map_err(|e| GatewayError::Execution(e.to_string()))?;
        while rows
            .next()
            .map_err(|e| GatewayError::Execution(e.to_string()))?
            .is_some()
        {}
        conn.changes()
    } else {
        let affected = stmt
            .execute(params_from_iter(values.iter()))
            .map_err(|e| GatewayError::Execution(e.to_string()))?;
        affected as u64
    };

    Ok(MutationSummary {
        last_insert_id: conn.last_insert_rowid(),
        rows_affected: i64::try_from(affected).unwrap_or(i64::MAX),
    })
}
