use axum::body::{Body, to_bytes};
use axum::extract::Query;
use axum::http::Request;
use axum::response::{IntoResponse, Json};
use serde_json::{Value, json};
use threads::permissions::AccessRole;
use tower::ServiceExt;

use super::*;
use crate::config::ServerConfig;

// =============================================================================
// FIXTURES
// =============================================================================

#[derive(serde::Deserialize)]
struct UpstreamQuery {
    thread_id: Option<String>,
}

async fn upstream_get(Query(query): Query<UpstreamQuery>) -> Json<Value> {
    match query.thread_id {
        Some(id) => Json(json!({
            "heading": format!("Thread {id}"),
            "human_message": ["How many orders?"],
            "Ai_response": ["There were 12 orders."],
        })),
        None => Json(json!([
            { "thread_id": "t1", "heading": "Orders", "human_message": ["a"], "ai_response": ["b"] },
            { "thread_id": "t2", "heading": null, "message_count": 4 },
        ])),
    }
}

async fn upstream_post(Query(query): Query<UpstreamQuery>, Json(body): Json<Value>) -> Json<Value> {
    let thread_id = query.thread_id.unwrap_or_else(|| "t-new".to_owned());
    let message = body["message"].as_str().unwrap_or_default().to_owned();
    Json(json!({ "thread_id": thread_id, "ai_response": ["earlier", format!("echo: {message}")] }))
}

async fn upstream_connect(Json(body): Json<Value>) -> axum::response::Response {
    if body["db_type"] == "nosql" && body.get("db_name").is_none() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "db_name is required" }))).into_response();
    }
    Json(json!({ "message": "Connected to reporting database" })).into_response()
}

async fn spawn_upstream() -> String {
    let upstream = Router::new()
        .route("/chat", get(upstream_get).post(upstream_post))
        .route("/connect-db", post(upstream_connect));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    format!("http://{addr}")
}

fn state_for(base_url: &str, role: AccessRole) -> AppState {
    AppState::new(ServerConfig {
        port: 0,
        chat_api_url: base_url.to_owned(),
        connect_api_url: base_url.to_owned(),
        role,
        upstream_timeout_secs: 5,
    })
    .unwrap()
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, value)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test]
async fn healthz_ok() {
    let router = api_routes(state_for("http://127.0.0.1:1", AccessRole::Member));
    let (status, _) = call(router, Request::builder().uri("/healthz").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn session_reports_configured_role() {
    let router = api_routes(state_for("http://127.0.0.1:1", AccessRole::Admin));
    let (status, body) = call(router, Request::builder().uri("/api/session").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "role": "admin" }));
}

#[tokio::test]
async fn thread_listing_is_relayed() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Member));
    let (status, body) = call(router, Request::builder().uri("/api/chat").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let threads = threads::wire::parse_thread_list(&body).unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].message_count, 2);
    assert_eq!(threads[1].display_heading(), "New Chat");
}

#[tokio::test]
async fn thread_history_forwards_thread_id() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Member));
    let (status, body) = call(router, Request::builder().uri("/api/chat?thread_id=t1").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let thread = threads::wire::parse_thread(&body).unwrap();
    assert_eq!(thread.heading.as_deref(), Some("Thread t1"));
    assert_eq!(thread.ai_response, vec![Some("There were 12 orders.".to_owned())]);
}

#[tokio::test]
async fn post_without_thread_lets_upstream_assign_one() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Member));
    let (status, body) = call(router, post_json("/api/chat", &json!({ "message": "Top regions?" }))).await;
    assert_eq!(status, StatusCode::OK);

    let reply = threads::wire::parse_post_reply(&body).unwrap();
    assert_eq!(reply.thread_id.as_deref(), Some("t-new"));
    assert_eq!(reply.reply, "echo: Top regions?");
}

#[tokio::test]
async fn post_with_thread_forwards_thread_id() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Member));
    let (_, body) = call(router, post_json("/api/chat?thread_id=t7", &json!({ "message": "and Q4?" }))).await;
    assert_eq!(body["thread_id"], "t7");
}

#[tokio::test]
async fn connect_db_relays_upstream_rejection() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Admin));
    let request = json!({ "database_uri": "mongodb://10.0.0.1:27017/", "db_type": "nosql" });
    let (status, body) = call(router, post_json("/api/connect-db", &request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let err = threads::wire::parse_error_detail(status.as_u16(), &body.to_string());
    assert_eq!(err.user_message(), "db_name is required");
}

#[tokio::test]
async fn connect_db_success_message() {
    let base = spawn_upstream().await;
    let router = api_routes(state_for(&base, AccessRole::Admin));
    let request = json!({ "database_uri": "postgresql://u:p@10.0.0.1/sales", "db_type": "sql" });
    let (status, body) = call(router, post_json("/api/connect-db", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(threads::wire::parse_connect_reply(&body), "Connected to reporting database");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let router = api_routes(state_for("http://127.0.0.1:1", AccessRole::Member));
    let (status, body) = call(router, Request::builder().uri("/api/chat").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().starts_with("assistant service unreachable"));
}
