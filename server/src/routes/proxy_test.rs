use super::*;

#[test]
fn upstream_url_joins_base_and_path() {
    assert_eq!(upstream_url("http://127.0.0.1:8000", CHAT_PATH), "http://127.0.0.1:8000/chat");
    assert_eq!(upstream_url("http://127.0.0.1:8000/", CONNECT_DB_PATH), "http://127.0.0.1:8000/connect-db");
}

#[test]
fn blank_thread_query_counts_as_absent() {
    let query = ThreadQuery { thread_id: Some("  ".to_owned()) };
    assert_eq!(query.thread_id(), None);
    let query = ThreadQuery { thread_id: Some("t-42".to_owned()) };
    assert_eq!(query.thread_id(), Some("t-42"));
}

#[test]
fn proxy_error_statuses() {
    assert_eq!(ProxyError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(ProxyError::Unreachable("refused".to_owned()).status(), StatusCode::BAD_GATEWAY);
    assert_eq!(ProxyError::Body("truncated".to_owned()).status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn proxy_error_response_carries_detail() {
    let response = ProxyError::Unreachable("connection refused".to_owned()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["detail"], "assistant service unreachable: connection refused");
}
