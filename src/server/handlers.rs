use std::{sync::Arc, time::Instant};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::gateway::{
    run_statement, ExecutionOutcome, Executor, GatewayError, ResponseEnvelope, Statement,
};

use super::{models::QueryRequest, AppState};

/// Performance metrics for one `/query` request
#[derive(Debug, Clone)]
pub struct QueryPerformanceMetrics {
    pub total_time: f64,
    pub decode_time: f64,
    pub execution_time: f64,
    pub query_type: String,
    pub result_rows: Option<i64>,
}

impl QueryPerformanceMetrics {
    pub fn new() -> Self {
        Self {
            total_time: 0.0,
            decode_time: 0.0,
            execution_time: 0.0,
            query_type: "unknown".to_string(),
            result_rows: None,
        }
    }

    pub fn log_performance(&self, sql: &str) {
        log::info!(
            "Query performance - Total: {:.3}ms, Decode: {:.3}ms, Exec: {:.3}ms, Type: {}, Rows: {}",
            self.total_time * 1000.0,
            self.decode_time * 1000.0,
            self.execution_time * 1000.0,
            self.query_type,
            self.result_rows
                .map_or("N/A".to_string(), |r| r.to_string())
        );

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "Performance breakdown for query: {}",
                sql.chars().take(100).collect::<String>()
            );
        }
    }

    pub fn to_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (
                "X-Query-Execution-Time",
                format!("{:.3}ms", self.execution_time * 1000.0),
            ),
            ("X-Query-Type", self.query_type.clone()),
        ];
        if let Some(rows) = self.result_rows {
            headers.push(("X-Query-Row-Count", rows.to_string()));
        }
        headers
    }
}

impl Default for QueryPerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness probe. Never touches the store.
pub async fn ping_handler() -> impl IntoResponse {
    Json(ResponseEnvelope::ping())
}

pub async fn query_handler(
    State(app_state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let mut metrics = QueryPerformanceMetrics::new();

    let decode_start = Instant::now();
    let decoded = body
        .map_err(|rejection| body_error(&rejection, app_state.config.max_body_bytes))
        .and_then(|body| QueryRequest::from_slice(&body))
        .and_then(QueryRequest::into_statement);
    metrics.decode_time = decode_start.elapsed().as_secs_f64();

    let (sql, result) = match decoded {
        Ok(statement) => {
            log::debug!(
                "Query handler called with sql: {}",
                statement.sql.chars().take(200).collect::<String>()
            );
            metrics.query_type = statement.category().as_str().to_string();

            let execution_start = Instant::now();
            let sql = statement.sql.clone();
            let result = execute_blocking(app_state.executor.clone(), statement).await;
            metrics.execution_time = execution_start.elapsed().as_secs_f64();
            (sql, result)
        }
        Err(e) => (String::new(), Err(e)),
    };

    match &result {
        Ok(outcome) => metrics.result_rows = Some(outcome.row_count()),
        Err(e) if e.is_client_fault() => {
            metrics.query_type = e.kind().to_string();
            log::warn!("Rejected query ({}): {}", e.kind(), e);
        }
        Err(e) => {
            log::error!(
                "Query failed ({}). SQL was:\n{}\nError: {}",
                e.kind(),
                sql,
                e
            );
        }
    }

    metrics.total_time = start_time.elapsed().as_secs_f64();
    metrics.log_performance(&sql);

    let envelope = ResponseEnvelope::assemble(result, app_state.config.verbose_errors);
    let mut response = (envelope.status(), Json(envelope)).into_response();
    for (key, value) in metrics.to_headers() {
        if let (Ok(header_name), Ok(header_value)) =
            (HeaderName::try_from(key), HeaderValue::try_from(value))
        {
            response.headers_mut().insert(header_name, header_value);
        }
    }
    response
}

fn body_error(rejection: &BytesRejection, limit: usize) -> GatewayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge { limit }
    } else {
        GatewayError::Decode(rejection.body_text())
    }
}

/// Rewrites the plain-text 413 that the body limit layer sends for an
/// oversized `Content-Length` into a failure envelope.
pub async fn envelope_oversized_body(State(limit): State<usize>, response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json {
        return response;
    }

    let err = GatewayError::PayloadTooLarge { limit };
    log::warn!("Rejected query ({}): {}", err.kind(), err);
    let envelope = ResponseEnvelope::failure(&err, true);
    (envelope.status(), Json(envelope)).into_response()
}

/// Run the statement on tokio's blocking pool; rusqlite calls block the thread.
async fn execute_blocking(
    executor: Executor,
    statement: Statement,
) -> Result<ExecutionOutcome, GatewayError> {
    tokio::task::spawn_blocking(move || run_statement(&executor, &statement))
        .await
        .map_err(|e| {
            log::error!("Query worker failed: {:?}", e);
            GatewayError::Internal(format!("query worker failed: {}", e))
        })?
}
