//! HOT, Vooi and SuperMeow port tests against a local mock server.

use std::sync::Arc;

use autoclaim_core::{Account, ClaimPort, Credentials, FailureKind, ServiceKind};
use autoclaim_providers::{PortContext, ServiceRegistry};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn port(kind: ServiceKind, server: &MockServer) -> Arc<dyn ClaimPort> {
    let ctx = PortContext::default().with_base_url(server.uri());
    ServiceRegistry::get(kind).unwrap().build_port(&ctx).unwrap()
}

fn account(kind: ServiceKind, creds: Value) -> Account {
    Account::new("acc", kind, Credentials::from_value(creds).unwrap())
}

// ============================================================================
// HOT
// ============================================================================

fn hot_account() -> Account {
    account(
        ServiceKind::Hot,
        json!({
            "authorization": "auth-token",
            "deviceId": "device-1",
            "telegramData": "tg-data",
            "gameState": { "refs": 3 }
        }),
    )
}

#[tokio::test]
async fn test_hot_claim_formats_storage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/hot/claim"))
        .and(header("Authorization", "auth-token"))
        .and(header("Deviceid", "device-1"))
        .and(header("Telegram-Data", "tg-data"))
        .and(header("Network", "mainnet"))
        .and(body_json(json!({ "game_state": { "refs": 3 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hot_in_storage": "2500000" })))
        .expect(1)
        .mount(&server)
        .await;

    let port = port(ServiceKind::Hot, &server);
    let account = hot_account();
    let session = port.login(&account).await.unwrap();
    assert_eq!(session.token(), "auth-token");

    let receipt = port.perform_claim(&account, &session).await.unwrap();
    assert_eq!(receipt.amount, Some(2.5));
    assert_eq!(receipt.detail, "hot_in_storage: 2.500000");
}

#[tokio::test]
async fn test_hot_unauthorized_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/hot/claim"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "bad token" })))
        .mount(&server)
        .await;

    let port = port(ServiceKind::Hot, &server);
    let account = hot_account();
    let session = port.login(&account).await.unwrap();
    let failure = port.perform_claim(&account, &session).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Fatal);
}

#[tokio::test]
async fn test_hot_garbage_body_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/hot/claim"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let port = port(ServiceKind::Hot, &server);
    let account = hot_account();
    let session = port.login(&account).await.unwrap();
    let failure = port.perform_claim(&account, &session).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Transient);
}

#[tokio::test]
async fn test_hot_login_needs_credentials() {
    let server = MockServer::start().await;
    let port = port(ServiceKind::Hot, &server);
    let failure = port
        .login(&account(ServiceKind::Hot, json!({})))
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Fatal);
}

// ============================================================================
// Vooi
// ============================================================================

async fn vooi_server(trade: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/auth/login"))
        .and(body_json(json!({ "initData": "init" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "tokens": { "access_token": "jwt" } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/autotrade"))
        .and(header("Authorization", "Bearer jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trade))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_vooi_claims_finished_trade() {
    let server = vooi_server(json!({ "autoTradeId": 9, "status": "finished" })).await;
    Mock::given(method("POST"))
        .and(path("/autotrade/claim"))
        .and(body_json(json!({ "autoTradeId": 9 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "reward": { "virtMoney": 40, "virtPoints": 2 } }),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/autotrade/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "autoTradeId": 10, "endTime": "later" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let port = port(ServiceKind::Vooi, &server);
    let account = account(ServiceKind::Vooi, json!({ "initData": "init" }));
    let session = port.login(&account).await.unwrap();

    let receipt = port.perform_claim(&account, &session).await.unwrap();
    assert_eq!(receipt.amount, Some(40.0));

    let farm = port.start_farming(&account, &session).await.unwrap().unwrap();
    assert_eq!(farm.detail, "farming ends at later");
}

#[tokio::test]
async fn test_vooi_running_trade_is_already_claimed() {
    let server = vooi_server(json!({ "autoTradeId": 9, "status": "in_progress", "endTime": "soon" })).await;

    let port = port(ServiceKind::Vooi, &server);
    let account = account(ServiceKind::Vooi, json!({ "init_data": "init" }));
    let session = port.login(&account).await.unwrap();

    let failure = port.perform_claim(&account, &session).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::AlreadyClaimed);
}

#[tokio::test]
async fn test_vooi_without_trade_claims_nothing() {
    let server = vooi_server(json!({})).await;

    let port = port(ServiceKind::Vooi, &server);
    let account = account(ServiceKind::Vooi, json!({ "initData": "init" }));
    let session = port.login(&account).await.unwrap();

    let receipt = port.perform_claim(&account, &session).await.unwrap();
    assert_eq!(receipt.amount, None);
    assert_eq!(receipt.detail, "no active auto trade");
}

// ============================================================================
// SuperMeow
// ============================================================================

#[tokio::test]
async fn test_supermeow_claim_and_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/meow/claim"))
        .and(query_param("telegram", "42"))
        .and(query_param("is_on_chain", "false"))
        .and(query_param("auth_data", "{\"hash\":\"h\"}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": 12.5 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/meow/info"))
        .and(query_param("telegram", "42"))
        .and(body_json(json!({ "user": { "id": 42 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": 12.5, "level": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let port = port(ServiceKind::SuperMeow, &server);
    let account = account(
        ServiceKind::SuperMeow,
        json!({ "telegram": 42, "auth_data": "{\"hash\":\"h\"}", "user": { "id": 42 } }),
    );
    let session = port.login(&account).await.unwrap();

    let receipt = port.perform_claim(&account, &session).await.unwrap();
    assert_eq!(receipt.amount, Some(12.5));

    let status = port.read_status(&account, &session).await.unwrap().unwrap();
    assert_eq!(status.amount, Some(12.5));
    assert!(port.tickets().is_none());
}
