#![allow(clippy::unwrap_used)]
// Integration tests for `HttpGateway` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitekit_api::{Error, HttpGateway, RequestGateway, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HttpGateway) {
    let server = MockServer::start().await;
    let gateway =
        HttpGateway::from_reqwest(&format!("{}/api", server.uri()), reqwest::Client::new())
            .unwrap();
    (server, gateway)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_with_query_params() {
    let (server, gateway) = setup().await;

    let body = json!({
        "blogs": [{ "_id": "b1", "title": "Hello" }],
        "total": 1,
        "totalPages": 1
    });

    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let query = [
        ("page", "1".to_owned()),
        ("limit", "10".to_owned()),
        ("search", "rust".to_owned()),
    ];
    let value = gateway.get("blogs", &query).await.unwrap();

    assert_eq!(value, body);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let (server, gateway) = setup().await;

    let payload = json!({ "title": "New post", "status": "draft" });
    let created = json!({ "_id": "b9", "title": "New post", "status": "draft" });

    Mock::given(method("POST"))
        .and(path("/api/blogs"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    let value = gateway.post("blogs", &payload).await.unwrap();
    assert_eq!(value["_id"], "b9");
}

#[tokio::test]
async fn test_put_targets_resource_path() {
    let (server, gateway) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/projects/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "_id": "p1", "title": "Edited" })),
        )
        .mount(&server)
        .await;

    let value = gateway
        .put("projects/p1", &json!({ "title": "Edited" }))
        .await
        .unwrap();
    assert_eq!(value["title"], "Edited");
}

#[tokio::test]
async fn test_delete_with_empty_body_yields_null() {
    let (server, gateway) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/services/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = gateway.delete("services/s1").await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn test_bearer_token_is_injected() {
    let server = MockServer::start().await;
    let token = SecretString::from("s3cret".to_owned());
    let gateway = HttpGateway::new(&server.uri(), &TransportConfig::default(), Some(&token))
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/blogs"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blogs": [] })))
        .expect(1)
        .mount(&server)
        .await;

    gateway.get("blogs", &[]).await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_message_is_extracted() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/blogs"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Title is required" })),
        )
        .mount(&server)
        .await;

    let result = gateway.post("blogs", &json!({})).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Title is required"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_field_is_used_when_message_absent() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db offline" })))
        .mount(&server)
        .await;

    let err = gateway.get("blogs", &[]).await.unwrap_err();
    assert_eq!(err.server_message(), Some("db offline"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_html_error_page_has_no_message() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/blogs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;

    let err = gateway.get("blogs/missing", &[]).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn test_malformed_success_body_is_deserialization_error() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = gateway.get("blogs", &[]).await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "{not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let gateway =
        HttpGateway::from_reqwest("http://127.0.0.1:9/api", reqwest::Client::new()).unwrap();

    let err = gateway.get("blogs", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
}
