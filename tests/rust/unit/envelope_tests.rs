use serde_json::json;
use sqlgate::gateway::{
    ExecutionOutcome, GatewayError, MutationSummary, ResponseEnvelope, Row, SqlValue,
};

#[test]
fn test_success_never_carries_error() {
    let mut row = Row::default();
    row.insert("v", SqlValue::Text("x".to_string()));

    for outcome in [
        ExecutionOutcome::Rows(vec![row]),
        ExecutionOutcome::Mutation(MutationSummary::default()),
    ] {
        let envelope = ResponseEnvelope::assemble(Ok(outcome), true);
        assert!(envelope.ok);
        assert!(envelope.data.is_some());
        assert!(envelope.error.is_none());
    }
}

#[test]
fn test_failure_never_carries_data() {
    let errors = [
        GatewayError::Decode("EOF while parsing a value".to_string()),
        GatewayError::PayloadTooLarge { limit: 1024 },
        GatewayError::EmptyQuery,
        GatewayError::Rejected {
            keyword: "pragma".to_string(),
        },
        GatewayError::Prepare("syntax error".to_string()),
        GatewayError::Execution("column index out of range".to_string()),
    ];
    for err in errors {
        let envelope = ResponseEnvelope::assemble(Err(err.clone()), true);
        assert!(!envelope.ok);
        assert!(envelope.data.is_none());
        let descriptor = envelope.error.expect("error descriptor");
        assert_eq!(descriptor.code, err.status_code().as_u16());
        assert_eq!(descriptor.message, err.to_string());
    }
}

#[test]
fn test_rejected_envelope_json() {
    let envelope = ResponseEnvelope::failure(
        &GatewayError::Rejected {
            keyword: "vacuum".to_string(),
        },
        false,
    );
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "error": {"message": "Invalid SQL: unsupported statement `vacuum`", "code": 400},
            "ok": false
        })
    );
}
