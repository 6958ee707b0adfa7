//! API 集成测试
//!
//! 使用内存仓储构建真实路由，通过 `oneshot` 发送请求。

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::{app_state::AppState, create_router};
use crate::config::AppConfig;
use crate::llm::LlmBackend;
use crate::observability::AppMetrics;

fn mock_app() -> Router {
    create_router(AppState::in_memory(
        AppConfig::development(),
        LlmBackend::MockMode,
        Arc::new(AppMetrics::default()),
    ))
}

async fn provider_app(server: &MockServer) -> Router {
    let mut config = AppConfig::development();
    config.llm.api_key = Some("test-key".into());
    config.llm.base_url = server.uri();
    let backend = LlmBackend::from_config(&config.llm).unwrap();
    create_router(AppState::in_memory(
        config,
        backend,
        Arc::new(AppMetrics::default()),
    ))
}

async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(server)
        .await;
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// 注册并登录，返回访问令牌
async fn sign_up(app: &Router) -> String {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "aarav", "email": "aarav@example.com", "password": "secret123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "aarav", "password": "secret123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_chat_in_mock_mode() {
    let app = mock_app();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/chat", json!({"message": "hello", "healthScore": 30}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["text"],
        "[MOCK] Please set a real GROQ_API_KEY in the backend .env file. Your score is 30."
    );
    assert_eq!(body["mood"], "stressed");
    assert!(body["action"].is_null());
}

#[tokio::test]
async fn test_chat_default_health_score() {
    let (_, body) = send(
        &mock_app(),
        json_request("POST", "/api/chat", json!({"message": "hello"}), None),
    )
    .await;

    assert_eq!(body["mood"], "happy");
    assert!(body["text"].as_str().unwrap().ends_with("Your score is 85."));
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let (status, body) = send(
        &mock_app(),
        json_request("POST", "/api/chat", json!({"message": "   "}), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_chat_with_provider_extracts_action() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        r#"Lunch again? { "ACTION": {"type":"log_expense","amount":250,"category":"Food","description":"Lunch at cafe"} }"#,
    )
    .await;
    let app = provider_app(&server).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/chat",
            json!({"message": "paid 250 for lunch", "healthScore": 60}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Lunch again?");
    assert_eq!(body["mood"], "neutral");
    assert_eq!(
        body["action"],
        json!({"type": "log_expense", "amount": 250.0, "category": "Food", "description": "Lunch at cafe"})
    );
}

#[tokio::test]
async fn test_authenticated_chat_records_transaction() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        r#"Logged. { "ACTION": {"type":"log_expense","amount":"42.5","category":"Transport""#,
    )
    .await;
    let app = provider_app(&server).await;
    let token = sign_up(&app).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/chat", json!({"message": "taxi 42.5"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Logged.");
    assert_eq!(body["action"]["amount"], 42.5);
    assert!(body["action"].get("description").is_none());

    let (status, body) = send(&app, get_request("/api/transactions", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["transactions"][0]["category"], "Transport");
}

#[tokio::test]
async fn test_chat_provider_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream trace id abc123"))
        .mount(&server)
        .await;
    let app = provider_app(&server).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/chat", json!({"message": "hi"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["detail"].as_str().unwrap().contains("abc123"));
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = mock_app();
    let token = sign_up(&app).await;

    let (status, body) = send(&app, get_request("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "aarav@example.com");
    assert_eq!(body["currency"], "USD");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_registration() {
    let app = mock_app();
    sign_up(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "other", "email": "aarav@example.com", "password": "secret123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = mock_app();
    sign_up(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "aarav@example.com", "password": "nope-nope"}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "Incorrect username or password");
}

fn form_login(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_form_encoded_login() {
    let app = mock_app();
    sign_up(&app).await;

    let (status, body) = send(
        &app,
        form_login("grant_type=password&username=aarav%40example.com&password=secret123&scope="),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = send(&app, get_request("/api/auth/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "aarav");

    let (status, body) = send(&app, form_login("username=aarav&password=wrong-pass")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn test_transactions_require_auth() {
    let (status, _) = send(&mock_app(), get_request("/api/transactions", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_transactions() {
    let app = mock_app();
    let token = sign_up(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/transactions",
            json!({"amount": 1200, "category": "Rent", "is_recurring": true}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_recurring"], true);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/transactions", json!({"amount": -5}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        get_request("/api/transactions?page=1&page_size=10", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page_size"], 10);

    let (status, body) = send(
        &app,
        get_request(
            "/api/transactions?page=18446744073709551615&page_size=200",
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
