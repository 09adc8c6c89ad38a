use std::time::Duration;

use agora_core::AgoraError;
use agora_core::connector::CancelOrderProvider;
use agora_kucoin::{KucoinConnector, KucoinCredentials};
use agora_kucoin::client::{KucoinClient, prehash, sign};
use agora_kucoin::dto::{ListQuery, OrderCreateRequest};
use httpmock::prelude::*;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

fn creds() -> KucoinCredentials {
    KucoinCredentials::new("key", "secret", "passphrase")
}

fn client(server: &MockServer, creds: Option<KucoinCredentials>) -> KucoinClient {
    KucoinClient::new(server.base_url(), creds, Duration::from_secs(5)).expect("client")
}

fn query(symbol: &str) -> ListQuery {
    ListQuery {
        symbol: Some(symbol.to_string()),
        start_at: Some(1_550_419_200_000),
        end_at: Some(1_550_505_600_000),
        current_page: 1,
        page_size: 500,
    }
}

#[test]
fn signature_matches_known_vector() {
    let payload = prehash(
        1_550_419_200_000,
        &Method::GET,
        "/api/v1/fills?symbol=BTC-USDT",
        "",
    );
    assert_eq!(payload, "1550419200000GET/api/v1/fills?symbol=BTC-USDT");
    assert_eq!(
        sign("secret", &payload).unwrap(),
        "ULcJ/Yx1zkfU6B+cJE4Tw63LDlbsfqz5sp1KCL2EBz0="
    );
    assert_eq!(
        sign("secret", "passphrase").unwrap(),
        "sWd5rQWAxDzYJTY6K2sov6seA0l3uNP70anWxITg8IA="
    );
}

#[test]
fn credentials_debug_is_redacted() {
    let shown = format!("{:?}", creds());
    assert!(shown.contains("key"));
    assert!(!shown.contains("\"secret\""));
    assert!(!shown.contains("\"passphrase\""));
}

#[tokio::test]
async fn fills_request_is_signed_and_decoded() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/fills")
                .query_param("symbol", "BTC-USDT")
                .query_param("startAt", "1550419200000")
                .query_param("endAt", "1550505600000")
                .query_param("currentPage", "1")
                .query_param("pageSize", "500")
                .header("KC-API-KEY", "key")
                .header("KC-API-KEY-VERSION", "2")
                .header("KC-API-PASSPHRASE", "sWd5rQWAxDzYJTY6K2sov6seA0l3uNP70anWxITg8IA=")
                .header_exists("KC-API-SIGN")
                .header_exists("KC-API-TIMESTAMP");
            then.status(200).json_body(json!({
                "code": "200000",
                "data": {
                    "currentPage": 1,
                    "pageSize": 500,
                    "totalNum": 1,
                    "totalPage": 1,
                    "items": [{
                        "symbol": "BTC-USDT",
                        "tradeId": "5c35c02709e4f67d5266954e",
                        "orderId": "5c35c02703aa673ceec2a168",
                        "counterOrderId": "5c1ab46003aa676e487fa8e3",
                        "side": "buy",
                        "liquidity": "taker",
                        "forceTaker": true,
                        "price": "0.083",
                        "size": "0.8424304",
                        "funds": "0.0699217232",
                        "fee": "0",
                        "feeRate": "0",
                        "feeCurrency": "USDT",
                        "stop": "",
                        "type": "limit",
                        "createdAt": 1547026472000_i64
                    }]
                }
            }));
        })
        .await;

    let page = client(&server, Some(creds()))
        .fills(&query("BTC-USDT"))
        .await
        .expect("fills page");
    mock.assert_async().await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].price, Decimal::new(83, 3));
    assert!(!page.has_more());
}

#[tokio::test]
async fn create_and_cancel_roundtrip_through_the_envelope() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/orders")
                .header("Content-Type", "application/json");
            then.status(200).json_body(json!({
                "code": "200000",
                "data": { "orderId": "5bd6e9286d99522a52e458de" }
            }));
        })
        .await;
    let cancel = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/v1/orders/5bd6e9286d99522a52e458de");
            then.status(200).json_body(json!({
                "code": "200000",
                "data": { "cancelledOrderIds": ["5bd6e9286d99522a52e458de"] }
            }));
        })
        .await;

    let c = client(&server, Some(creds()));
    let created = c
        .create_order(&OrderCreateRequest {
            client_oid: "my-ref".into(),
            side: "buy".into(),
            symbol: "BTC-USDT".into(),
            order_type: "limit".into(),
            price: Some(Decimal::new(10_000, 0)),
            size: Some(Decimal::new(1, 2)),
            stop: None,
            stop_price: None,
        })
        .await
        .expect("order created");
    assert_eq!(created.order_id, "5bd6e9286d99522a52e458de");

    let cancelled = c
        .cancel_order("5bd6e9286d99522a52e458de")
        .await
        .expect("order cancelled");
    assert_eq!(cancelled.cancelled_order_ids, ["5bd6e9286d99522a52e458de"]);

    create.assert_async().await;
    cancel.assert_async().await;
}

#[tokio::test]
async fn cancel_never_leaves_the_single_order_path() {
    let server = MockServer::start_async().await;
    let cancel_all = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/v1/orders");
            then.status(200).json_body(json!({
                "code": "200000",
                "data": { "cancelledOrderIds": ["a", "b"] }
            }));
        })
        .await;
    let any_delete = server
        .mock_async(|when, then| {
            when.method(DELETE);
            then.status(200).json_body(json!({
                "code": "200000",
                "data": { "cancelledOrderIds": [] }
            }));
        })
        .await;

    let connector = KucoinConnector::builder()
        .base_url(server.base_url())
        .credentials(creds())
        .build()
        .expect("connector");
    for id in ["../orders", "..", "abc?symbol=BTC-USDT", "a/b", "a b", "abc#x", ""] {
        let err = connector.cancel_order(id).await.unwrap_err();
        assert!(matches!(err, AgoraError::InvalidArg(_)), "{id:?}: {err:?}");
        let err = client(&server, Some(creds())).cancel_order(id).await.unwrap_err();
        assert!(matches!(err, AgoraError::InvalidArg(_)), "{id:?}: {err:?}");
    }

    assert_eq!(cancel_all.hits_async().await, 0);
    assert_eq!(any_delete.hits_async().await, 0);
}

#[tokio::test]
async fn business_error_maps_to_connector_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/hist-orders");
            then.status(200)
                .json_body(json!({ "code": "400100", "msg": "Invalid Parameter." }));
        })
        .await;

    let err = client(&server, Some(creds()))
        .hist_orders(&query("BTC-USDT"))
        .await
        .unwrap_err();
    match err {
        AgoraError::Connector { connector, msg } => {
            assert_eq!(connector, "agora-kucoin");
            assert!(msg.contains("400100"), "{msg}");
        }
        other => panic!("expected connector error, got {other:?}"),
    }
}

#[tokio::test]
async fn auth_and_rate_limit_failures_are_transport_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/fills");
            then.status(401)
                .json_body(json!({ "code": "400001", "msg": "Please check the header." }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/hist-orders");
            then.status(429).body("Too Many Requests");
        })
        .await;

    let c = client(&server, None);
    let err = c.fills(&query("BTC-USDT")).await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
    let err = c.hist_orders(&query("BTC-USDT")).await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let c = KucoinClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).expect("client");
    let err = c.fills(&query("BTC-USDT")).await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}

#[tokio::test]
async fn malformed_payload_is_a_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/orders").query_param("status", "active");
            then.status(200).json_body(json!({
                "code": "200000",
                "data": { "currentPage": 1 }
            }));
        })
        .await;

    let err = client(&server, None)
        .active_orders(&query("BTC-USDT"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgoraError::Data(_)), "{err:?}");
}
