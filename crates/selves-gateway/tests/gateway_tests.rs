// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exchange scenarios against a mock chat proxy.

use std::time::Duration;

use selves_config::model::BackendConfig;
use selves_core::traits::adapter::PluginAdapter;
use selves_core::traits::gateway::BackendGateway;
use selves_core::types::{HealthStatus, Message, PLACEHOLDER};
use selves_gateway::{ProxyGateway, TRANSPORT_FALLBACK};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ROUTE: &str = "/api/openai-chat";

fn gateway_for(server: &MockServer) -> ProxyGateway {
    gateway_with(BackendConfig {
        endpoint: format!("{}{ROUTE}", server.uri()),
        ..BackendConfig::default()
    })
}

fn gateway_with(config: BackendConfig) -> ProxyGateway {
    ProxyGateway::new(&config).expect("gateway should build")
}

async fn respond_with(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn sent_body(request: &Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}

#[tokio::test]
async fn success_returns_content() {
    let server =
        respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": "Hello"})))
            .await;
    let reply = gateway_for(&server).exchange("sys", &[], "hi").await;
    assert_eq!(reply, "Hello");
}

#[tokio::test]
async fn server_error_surfaces_status_error_and_detail() {
    let server = respond_with(
        ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "boom", "detail": "x"})),
    )
    .await;
    let reply = gateway_for(&server).exchange("sys", &[], "hi").await;
    assert!(reply.contains("500"), "got {reply}");
    assert!(reply.contains("boom"), "got {reply}");
    assert!(reply.contains("x"), "got {reply}");
}

#[tokio::test]
async fn plain_text_success_is_returned_verbatim() {
    let server = respond_with(ResponseTemplate::new(200).set_body_string("plain text")).await;
    let reply = gateway_for(&server).exchange("sys", &[], "hi").await;
    assert_eq!(reply, "plain text");
}

#[tokio::test]
async fn empty_content_yields_placeholder_text() {
    let server =
        respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": "  "})))
            .await;
    let reply = gateway_for(&server).exchange("sys", &[], "hi").await;
    assert_eq!(reply, PLACEHOLDER);
}

#[tokio::test]
async fn unreachable_proxy_yields_fallback() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = gateway_with(BackendConfig {
        endpoint: format!("http://{addr}{ROUTE}"),
        ..BackendConfig::default()
    });
    let reply = gateway.exchange("sys", &[], "hi").await;
    assert_eq!(reply, TRANSPORT_FALLBACK);
}

#[tokio::test]
async fn timeout_yields_fallback() {
    let server = respond_with(
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"content": "late"}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let gateway = gateway_with(BackendConfig {
        endpoint: format!("{}{ROUTE}", server.uri()),
        timeout_secs: 1,
        ..BackendConfig::default()
    });
    let reply = gateway.exchange("sys", &[], "hi").await;
    assert_eq!(reply, TRANSPORT_FALLBACK);
}

#[tokio::test]
async fn request_carries_windowed_history_and_model() {
    let server =
        respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": "ok"})))
            .await;
    let gateway = gateway_with(BackendConfig {
        endpoint: format!("{}{ROUTE}", server.uri()),
        history_window: 2,
        model: Some("llama-3".into()),
        ..BackendConfig::default()
    });

    let history = vec![
        Message::assistant("greeting"),
        Message::user("first"),
        Message::assistant("reply"),
        Message::placeholder(),
    ];
    gateway.exchange("be kind", &history, "second").await;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body = sent_body(&requests[0]);
    assert_eq!(body["systemPrompt"], "be kind");
    assert_eq!(body["model"], "llama-3");
    assert_eq!(
        body["messages"],
        serde_json::json!([
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": "reply"},
            {"role": "user", "content": "second"}
        ])
    );
}

#[tokio::test]
async fn health_reflects_proxy_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .mount(&server)
        .await;
    assert_eq!(
        gateway_for(&server).health_check().await.unwrap(),
        HealthStatus::Healthy
    );

    let degraded = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&degraded)
        .await;
    assert!(matches!(
        gateway_for(&degraded).health_check().await.unwrap(),
        HealthStatus::Degraded(_)
    ));
}
