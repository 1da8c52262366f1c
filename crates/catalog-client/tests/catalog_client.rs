//! Integration tests for `CatalogClient::fetch_catalog`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_client::{normalize_catalog, CatalogClient, ClientError, ClientSettings};

fn settings(server: &MockServer, max_retries: u32) -> ClientSettings {
    ClientSettings {
        api_url: format!("{}/products?limit=100", server.uri()),
        user_agent: "catalog-test/0.1".to_owned(),
        request_timeout_secs: Some(5),
        max_retries,
        backoff_base_secs: 0,
    }
}

/// Builds a `CatalogClient` suitable for tests: 5-second timeout, no retries.
fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&settings(server, 0)).expect("failed to build test CatalogClient")
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_catalog_returns_records_in_api_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {"id": 2, "title": "Kettle", "price": 25},
                {"id": 1, "title": "Mug", "price": 4.5}
            ],
            "total": 2,
            "skip": 0,
            "limit": 100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server).fetch_catalog().await.expect("fetch ok");
    let products = normalize_catalog(records);
    let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(products[1].title, "Mug");
}

#[tokio::test]
async fn fetch_catalog_without_products_key_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let records = test_client(&server).fetch_catalog().await.expect("fetch ok");
    assert!(records.is_empty());
}

#[tokio::test]
async fn fetch_catalog_sends_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("user-agent", "catalog-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server).fetch_catalog().await.expect("fetch ok");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_catalog_server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
    assert!(err.to_string().starts_with("failed to load products"));
}

#[tokio::test]
async fn fetch_catalog_not_found_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn fetch_catalog_invalid_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_catalog_rate_limited_without_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, ClientError::RateLimited { retry_after_secs: 7 }),
        "expected RateLimited(7), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_catalog_retries_rate_limit_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{"id": 9, "title": "Lamp"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&settings(&server, 2)).expect("client");
    let records = client.fetch_catalog().await.expect("fetch ok after retry");
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn fetch_catalog_connection_refused_is_http_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let uri = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let client = CatalogClient::new(&ClientSettings {
        api_url: format!("{uri}/products"),
        user_agent: "catalog-test/0.1".to_owned(),
        request_timeout_secs: Some(2),
        max_retries: 0,
        backoff_base_secs: 0,
    })
    .expect("client");

    let err = client.fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Http(_)),
        "expected Http, got: {err:?}"
    );
}
