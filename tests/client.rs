use std::time::{Duration, Instant};

use serde::Deserialize;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use snaphub::{HubClient, HubConfig, HubError, QueryRequest};

const SPACES_QUERY: &str = "query Spaces($first: Int, $skip: Int) { spaces(first: $first, skip: $skip) { id name } }";

#[derive(Debug, Deserialize)]
struct SpacesData {
    spaces: Vec<Space>,
}

#[derive(Debug, Deserialize)]
struct Space {
    id: String,
}

fn unlimited_client(server: &MockServer) -> HubClient {
    HubClient::new(&HubConfig::with_endpoint(server.uri()).unlimited()).expect("client")
}

#[tokio::test]
async fn execute_query_success() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "query": "query { spaces(first: 1) { id } }",
        "variables": {},
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/json"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": [{"id": "test.eth"}]},
            "errors": [],
        })))
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let data: SpacesData = client
        .execute(QueryRequest::new("query { spaces(first: 1) { id } }"))
        .await
        .expect("query should succeed");

    assert_eq!(data.spaces.len(), 1);
    assert_eq!(data.spaces[0].id, "test.eth");
}

#[tokio::test]
async fn execute_query_sends_variables() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "query": SPACES_QUERY,
        "variables": {"first": 20, "skip": 0},
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": [{"id": "aave.eth"}, {"id": "ens.eth"}]},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = QueryRequest::new(SPACES_QUERY)
        .with_variable("first", 20)
        .expect("serializable variable")
        .with_variable("skip", 0)
        .expect("serializable variable");

    let client = unlimited_client(&server);
    let data: SpacesData = client.execute(request).await.expect("query should succeed");

    assert_eq!(data.spaces.len(), 2);
}

#[tokio::test]
async fn first_graphql_error_wins_over_data() {
    let server = MockServer::start().await;

    // Well-formed data alongside errors: errors still take precedence,
    // and only the first message is reported.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": [{"id": "test.eth"}]},
            "errors": [
                {"message": "rate limited upstream"},
                {"message": "second error, discarded"},
            ],
        })))
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("errors must fail the call");

    match err {
        HubError::Graphql { message } => assert_eq!(message, "rate limited upstream"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_200_status_skips_body_parsing() {
    let server = MockServer::start().await;

    // A body that would fail envelope parsing; the status alone must
    // determine the outcome.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("non-200 must fail");

    match err {
        HubError::HttpStatus { status } => assert_eq!(status.as_u16(), 502),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn malformed_envelope_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("garbage body must fail");

    assert!(matches!(err, HubError::Deserialize(_)));
}

#[tokio::test]
async fn envelope_without_data_or_errors_is_missing_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("empty envelope must fail");

    assert!(matches!(err, HubError::MissingData));
}

#[tokio::test]
async fn empty_query_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let client = unlimited_client(&server);
    let err = client
        .execute::<serde_json::Value>(QueryRequest::new(""))
        .await
        .expect_err("empty query must be rejected");

    assert!(matches!(err, HubError::EmptyQuery));
    server.verify().await;
}

#[tokio::test]
async fn transport_timeout_is_an_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"spaces": []}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = HubConfig::with_endpoint(server.uri())
        .unlimited()
        .with_timeout(Duration::from_millis(50));
    let client = HubClient::new(&config).expect("client");

    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("slow server must time out");

    match err {
        HubError::Http(info) => assert!(info.is_timeout, "expected timeout, got {info:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn sequential_queries_are_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": []},
        })))
        .expect(3)
        .mount(&server)
        .await;

    let interval = Duration::from_millis(100);
    let config = HubConfig::with_endpoint(server.uri())
        .with_burst_capacity(1)
        .with_refill_interval(interval);
    let client = HubClient::new(&config).expect("client");

    let start = Instant::now();
    for _ in 0..3 {
        let _: SpacesData = client
            .execute(QueryRequest::new("query { spaces { id } }"))
            .await
            .expect("query should succeed");
    }

    // Burst of 1: the second and third calls each wait a full interval.
    assert!(start.elapsed() >= interval * 2);
    server.verify().await;
}

#[tokio::test]
async fn disabled_limiter_adds_no_delay() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": []},
        })))
        .expect(3)
        .mount(&server)
        .await;

    // Defaults would space these 2s apart; unlimited must not.
    let client = unlimited_client(&server);

    let start = Instant::now();
    for _ in 0..3 {
        let _: SpacesData = client
            .execute(QueryRequest::new("query { spaces { id } }"))
            .await
            .expect("query should succeed");
    }

    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn concurrent_queries_share_one_budget() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"spaces": []},
        })))
        .expect(4)
        .mount(&server)
        .await;

    let interval = Duration::from_millis(80);
    let config = HubConfig::with_endpoint(server.uri())
        .with_burst_capacity(1)
        .with_refill_interval(interval);
    let client = std::sync::Arc::new(HubClient::new(&config).expect("client"));

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..4 {
        let client = std::sync::Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
                .await
        }));
    }

    for handle in handles {
        handle.await.expect("task").expect("query should succeed");
    }

    // Four admissions through a burst-1 bucket need three full intervals.
    assert!(start.elapsed() >= interval * 3);
    server.verify().await;
}

#[tokio::test]
async fn rejects_zero_burst_capacity() {
    let config = HubConfig::with_endpoint("http://localhost:1").with_burst_capacity(0);
    let err = HubClient::new(&config).expect_err("zero capacity must be rejected");
    assert!(matches!(err, HubError::RateLimit(_)));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Nothing listens on this port.
    let config = HubConfig::with_endpoint("http://127.0.0.1:9").unlimited();
    let client = HubClient::new(&config).expect("client");

    let err = client
        .execute::<SpacesData>(QueryRequest::new("query { spaces { id } }"))
        .await
        .expect_err("connect must fail");

    match err {
        HubError::Http(info) => assert!(info.is_connect || info.is_timeout),
        other => panic!("unexpected error: {other:?}"),
    }
}
