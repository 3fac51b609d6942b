use super::*;

#[test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("/api", "/chat"), "/api/chat");
    assert_eq!(endpoint("/api/", "/connect-db"), "/api/connect-db");
    assert_eq!(endpoint("http://localhost:8000", "/chat"), "http://localhost:8000/chat");
}

#[test]
fn same_origin_uses_api_prefix() {
    assert_eq!(HttpChatService::same_origin().base_url(), "/api");
}

#[test]
fn transport_error_keeps_message() {
    assert_eq!(transport_error("connection refused"), ApiError::Transport("connection refused".to_owned()));
}
