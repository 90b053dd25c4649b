//! Contract tests: header construction on the wire, metrics
//! accounting, and fail-fast gate behavior.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use gateway_client::config::{
    AuthScheme, EndpointConfig, EndpointRegistry, Environment, RateLimitConfig,
};
use gateway_client::security::StaticCredentials;
use gateway_client::{GatewayClient, GatewayError, RequestOptions, TransportError};
use reqwest::header::{HeaderValue, ACCEPT};

mod common;

fn endpoint(id: &str, addr: SocketAddr, auth: AuthScheme) -> EndpointConfig {
    EndpointConfig {
        id: id.to_string(),
        base_url: format!("http://{addr}"),
        health_check_path: "/health".to_string(),
        auth,
        rate_limit: RateLimitConfig {
            max_requests: 100,
            window_secs: 60,
        },
        timeout_ms: 2_000,
        retry_attempts: 0,
        requires_vpn: false,
    }
}

fn client_with(ep: EndpointConfig, credentials: StaticCredentials) -> GatewayClient {
    let registry = EndpointRegistry::from_endpoints(Environment::Development, vec![ep]);
    GatewayClient::new(registry, Arc::new(credentials)).unwrap()
}

/// Capture request heads while serving a fixed 200 response.
async fn capturing_upstream() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let heads = Arc::new(Mutex::new(Vec::new()));
    let sink = heads.clone();
    let addr = common::start_programmable_upstream(move |head| {
        let sink = sink.clone();
        async move {
            sink.lock().unwrap().push(head);
            (200, r#"{"ok":true}"#.to_string())
        }
    })
    .await;
    (addr, heads)
}

#[tokio::test]
async fn test_fixed_and_auth_headers_reach_the_wire() {
    let (addr, heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("commercial-registry", addr, AuthScheme::ApiKey),
        StaticCredentials::new().with("commercial-registry", "cr-key-1"),
    );

    client
        .execute::<serde_json::Value>("commercial-registry", "/companies/42", RequestOptions::get())
        .await
        .unwrap();

    let heads = heads.lock().unwrap();
    let head = &heads[0];
    assert!(head.starts_with("GET /companies/42 "), "head was: {head}");
    assert!(head.contains("content-type: application/json"));
    assert!(head.contains("accept: application/json"));
    assert!(head.contains("x-api-key: cr-key-1"));
    assert!(head.contains("x-request-id: "));
}

#[tokio::test]
async fn test_bearer_header_reaches_the_wire() {
    let (addr, heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new().with("tax-authority", "tok-99"),
    );

    client
        .execute::<serde_json::Value>("tax-authority", "/returns", RequestOptions::get())
        .await
        .unwrap();

    let heads = heads.lock().unwrap();
    assert!(heads[0].contains("authorization: Bearer tok-99"));
}

#[tokio::test]
async fn test_missing_credential_sends_no_auth_header() {
    let (addr, heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new(),
    );

    client
        .execute::<serde_json::Value>("tax-authority", "/returns", RequestOptions::get())
        .await
        .expect("credential absence is not an error");

    let heads = heads.lock().unwrap();
    assert!(!heads[0].contains("authorization:"));
}

#[tokio::test]
async fn test_header_precedence_on_the_wire() {
    let (addr, heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new().with("tax-authority", "configured-tok"),
    );

    // The caller may replace computed headers (auth here), but the
    // fixed JSON pair is not overridable.
    let options = RequestOptions::get()
        .header(ACCEPT, HeaderValue::from_static("application/pdf"))
        .header(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer caller-tok"),
        );
    client
        .execute::<serde_json::Value>("tax-authority", "/returns/1/document", options)
        .await
        .unwrap();

    let heads = heads.lock().unwrap();
    assert!(heads[0].contains("accept: application/json"));
    assert!(!heads[0].contains("accept: application/pdf"));
    assert!(heads[0].contains("authorization: Bearer caller-tok"));
    assert!(!heads[0].contains("authorization: Bearer configured-tok"));
}

#[tokio::test]
async fn test_unknown_endpoint_leaves_tables_unmodified() {
    let (addr, _heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new(),
    );

    let err = client
        .execute::<serde_json::Value>("does-not-exist", "/x", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownEndpoint(_)));

    assert!(client.metrics("does-not-exist").is_none());
    for (_, m) in client.all_metrics() {
        assert_eq!(m.total_requests, 0);
    }
    assert!(client.breaker_state("does-not-exist").is_none());
}

#[tokio::test]
async fn test_rate_limited_calls_do_not_count_as_requests() {
    let (addr, _heads) = capturing_upstream().await;
    let mut ep = endpoint("tax-authority", addr, AuthScheme::Bearer);
    ep.rate_limit = RateLimitConfig {
        max_requests: 1,
        window_secs: 60,
    };
    let client = client_with(ep, StaticCredentials::new());

    client
        .execute::<serde_json::Value>("tax-authority", "/x", RequestOptions::get())
        .await
        .unwrap();
    for _ in 0..3 {
        assert!(matches!(
            client
                .execute::<serde_json::Value>("tax-authority", "/x", RequestOptions::get())
                .await
                .unwrap_err(),
            GatewayError::RateLimited(_)
        ));
    }

    let m = client.metrics("tax-authority").unwrap();
    assert_eq!(m.total_requests, 1);
    assert_eq!(m.failed_requests, 0, "gate rejections are not failures");
}

#[tokio::test]
async fn test_undecodable_body_is_a_transport_failure() {
    let calls = Arc::new(std::sync::atomic::AtomicU32::new(0));
    let cc = calls.clone();
    let addr = common::start_programmable_upstream(move |_head| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, "<html>maintenance page</html>".to_string())
        }
    })
    .await;

    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new(),
    );
    let err = client
        .execute::<serde_json::Value>("tax-authority", "/x", RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        GatewayError::Exhausted { source, .. } => {
            assert!(matches!(source, TransportError::Decode(_)));
        }
        other => panic!("expected exhausted error, got {other}"),
    }
    assert_eq!(client.metrics("tax-authority").unwrap().failed_requests, 1);
}

#[tokio::test]
async fn test_metrics_mean_over_successful_calls() {
    let (addr, _heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("tax-authority", addr, AuthScheme::Bearer),
        StaticCredentials::new(),
    );

    for _ in 0..4 {
        client
            .execute::<serde_json::Value>("tax-authority", "/x", RequestOptions::get())
            .await
            .unwrap();
    }

    let m = client.metrics("tax-authority").unwrap();
    assert_eq!(m.total_requests, 4);
    assert_eq!(m.successful_requests, 4);
    assert_eq!(m.failed_requests, 0);
    assert!(m.average_response_time_ms > 0.0);
    assert!(
        m.average_response_time_ms < 2_000.0,
        "local calls should be far under the timeout"
    );
    assert!(m.last_request_ms.is_some());
}

#[tokio::test]
async fn test_post_body_reaches_upstream() {
    let (addr, heads) = capturing_upstream().await;
    let client = client_with(
        endpoint("e-invoicing", addr, AuthScheme::Oauth2),
        StaticCredentials::new().with("e-invoicing", "oauth-tok"),
    );

    let body = serde_json::json!({"invoice": {"number": "INV-7"}});
    client
        .execute::<serde_json::Value>("e-invoicing", "/documents", RequestOptions::post(body))
        .await
        .unwrap();

    let heads = heads.lock().unwrap();
    let head = &heads[0];
    assert!(head.starts_with("POST /documents "), "head was: {head}");
    assert!(head.contains("authorization: Bearer oauth-tok"));
}
