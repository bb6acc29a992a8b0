#![allow(clippy::unwrap_used)]
// End-to-end tests: Backend over the real HTTP gateway against wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitekit_core::{
    Backend, BlogPost, ClientConfig, CoreError, ListOptions, MutationCoordinator, Project,
    UpdateProjectRequest,
};

fn backend(server: &MockServer) -> Backend {
    let url = format!("{}/api", server.uri()).parse().unwrap();
    Backend::new(ClientConfig::new(url).with_token(SecretString::from("t0ken"))).unwrap()
}

#[tokio::test]
async fn admin_mount_over_http() {
    let server = MockServer::start().await;
    let blogs: Vec<_> = (1..=5)
        .map(|i| json!({ "_id": format!("b{i}"), "title": format!("Post {i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blogs": blogs, "total": 23, "totalPages": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let view = backend(&server).list_view::<BlogPost>(ListOptions::admin());
    assert!(view.mount().await.is_applied());

    let state = view.snapshot();
    assert_eq!(state.items.len(), 5);
    assert_eq!(state.total_count, 23);
    assert!(state.has_more());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=1&limit=10"));
}

#[tokio::test]
async fn view_debounce_prefers_explicit_option_over_config() {
    let server = MockServer::start().await;
    let url = format!("{}/api", server.uri()).parse().unwrap();
    let mut config = ClientConfig::new(url);
    config.search_debounce = Duration::from_millis(250);
    let backend = Backend::new(config).unwrap();

    let configured = backend.list_view::<BlogPost>(ListOptions::feed());
    assert_eq!(configured.search_debounce(), Duration::from_millis(250));

    let explicit =
        backend.list_view::<BlogPost>(ListOptions::feed().with_debounce(Duration::from_millis(40)));
    assert_eq!(explicit.search_debounce(), Duration::from_millis(40));
}

#[tokio::test]
async fn server_message_reaches_list_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Maintenance window" })),
        )
        .mount(&server)
        .await;

    let view = backend(&server).list_view::<BlogPost>(ListOptions::feed());
    let err = view.mount().await.into_result().unwrap_err();

    assert!(matches!(err, CoreError::Server { status: 503, .. }));
    assert_eq!(view.snapshot().error.as_deref(), Some("Maintenance window"));
}

#[tokio::test]
async fn update_sends_partial_payload_with_token_then_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{ "_id": "p1", "title": "Site" }], "total": 1
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/p1"))
        .and(header("authorization", "Bearer t0ken"))
        .and(body_json(json!({ "featured": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project": { "_id": "p1", "title": "Site", "featured": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    let view = backend.list_view::<Project>(ListOptions::admin());
    view.mount().await;
    let coordinator: MutationCoordinator<Project> =
        backend.coordinator(&view, std::sync::Arc::new(sitekit_core::LogNotifier));

    let patch = UpdateProjectRequest {
        featured: Some(true),
        ..UpdateProjectRequest::default()
    };
    let updated = coordinator.update("p1", &patch).await.unwrap();
    assert!(updated.featured);
}
