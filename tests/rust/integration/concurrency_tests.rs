use axum::http::StatusCode;
use serde_json::json;

use super::common::{query, test_app};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_share_one_store() {
    let app = test_app();
    query(&app, "CREATE TABLE t (id INTEGER PRIMARY KEY, v INTEGER)", json!([])).await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            query(&app, "INSERT INTO t(v) VALUES (?)", json!([i])).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        ids.push(body["data"]["last_insert_id"].as_i64().unwrap());
    }

    // Each insert saw its own row id
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 32);

    let (_, body) = query(&app, "SELECT COUNT(*) AS c FROM t", json!([])).await;
    assert_eq!(body["data"]["data"], json!([{"c": 32}]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_are_isolated_per_request() {
    let app = test_app();
    query(&app, "CREATE TABLE t (v INTEGER)", json!([])).await;

    let bad = {
        let app = app.clone();
        tokio::spawn(async move { query(&app, "SELECT missing FROM t", json!([])).await })
    };
    let good = {
        let app = app.clone();
        tokio::spawn(async move { query(&app, "SELECT 1 AS n", json!([])).await })
    };

    let (bad_status, _) = bad.await.unwrap();
    let (good_status, good_body) = good.await.unwrap();
    assert_eq!(bad_status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(good_status, StatusCode::OK);
    assert_eq!(good_body["data"]["data"], json!([{"n": 1}]));
}
