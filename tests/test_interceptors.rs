//! Interceptor pipeline: ordering, credential injection, failure propagation

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::{Value, json};
use uplink::async_trait;
use uplink::{
    BearerAuth, Error, HttpClient, InMemoryStore, RequestConfig, RequestContext,
    RequestInterceptor, Result,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{TagRequest, TagResponse, enveloped_body};

#[tokio::test]
async fn test_request_chain_runs_in_registration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ordered"))
        .and(header("x-order", "AB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(enveloped_body(json!(1))))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    client.use_request_interceptor(TagRequest("A"));
    client.use_request_interceptor(TagRequest("B"));

    let envelope = client
        .get::<Value>("/ordered", RequestConfig::new())
        .await
        .unwrap();
    assert!(envelope.is_success);
}

#[tokio::test]
async fn test_response_chain_runs_in_registration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ordered"))
        .respond_with(ResponseTemplate::new(200).set_body_json(enveloped_body(json!(1))))
        .mount(&server)
        .await;

    let mut client = HttpClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    client.use_response_interceptor(TagResponse("first"));
    client.use_response_interceptor(TagResponse("second"));

    let envelope = client
        .get::<Value>("/ordered", RequestConfig::new())
        .await
        .unwrap();

    let messages: Vec<_> = envelope
        .notifications
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[tokio::test]
async fn test_request_interceptor_failure_rejects_the_call() {
    struct Failing;

    #[async_trait]
    impl RequestInterceptor for Failing {
        async fn intercept(&self, _ctx: RequestContext) -> Result<RequestContext> {
            Err(Error::Interceptor("auth store unavailable".to_string()))
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = HttpClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    client.use_request_interceptor(Failing);

    let result = client.get::<Value>("/never", RequestConfig::new()).await;
    assert_matches!(result, Err(Error::Interceptor(_)));
}

#[tokio::test]
async fn test_bearer_auth_attaches_only_to_internal_endpoints() {
    let internal = MockServer::start().await;
    let external = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(enveloped_body(json!(1))))
        .expect(1)
        .mount(&internal)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&external)
        .await;

    let store = InMemoryStore::new();
    store.insert("session", "tok-9");

    let mut client = HttpClient::builder()
        .base_url(internal.uri())
        .build()
        .unwrap();
    client.use_request_interceptor(BearerAuth::new(Arc::new(store), "session"));

    // Relative endpoint: credential attached.
    let envelope = client.get::<Value>("/me", RequestConfig::new()).await.unwrap();
    assert!(envelope.is_success);

    // Absolute third-party endpoint: credential withheld.
    let envelope = client
        .get::<Value>(&format!("{}/public", external.uri()), RequestConfig::new())
        .await
        .unwrap();
    assert!(envelope.is_success);

    let seen = external.received_requests().await.unwrap();
    assert!(seen[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_bearer_auth_reads_store_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(enveloped_body(json!(1))))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryStore::new());
    let mut client = HttpClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    client.use_request_interceptor(BearerAuth::new(store.clone(), "session"));

    client.get::<Value>("/me", RequestConfig::new()).await.unwrap();
    store.insert("session", "tok-later");
    client.get::<Value>("/me", RequestConfig::new()).await.unwrap();

    let seen = server.received_requests().await.unwrap();
    assert!(seen[0].headers.get("authorization").is_none());
    assert_eq!(
        seen[1].headers.get("authorization").unwrap(),
        "Bearer tok-later"
    );
}
