//! Path parameters reach the provider as one escaped segment, so an encoded
//! `../` in a route cannot address a different provider resource.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use commlink_twilio::HttpConnector;
use tower::ServiceExt;
use wiremock::matchers::{any, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{assert_error_code, full_credentials, json_request, parse_body, ORIGIN};

async fn provider() -> MockServer {
    let server = MockServer::start().await;

    // The resource an unescaped traversal would land on
    Mock::given(path("/v1/Services/ISvictim"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": 20404,
            "message": "The requested resource was not found",
            "status": 404
        })))
        .mount(&server)
        .await;

    server
}

async fn call(server: &MockServer, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
    let connector = HttpConnector::new(server.uri(), server.uri());
    let router =
        commlink_app::create_router(full_credentials(), Arc::new(connector), ORIGIN).unwrap();

    let response = router
        .oneshot(json_request(method, uri, None))
        .await
        .unwrap();
    let status = response.status();
    (status, parse_body(response).await)
}

async fn assert_nothing_outside(server: &MockServer, prefix: &str) {
    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    for request in &requests {
        let path = request.url.path();
        assert!(path.starts_with(prefix), "provider saw {path}");
    }
}

#[tokio::test]
async fn test_encoded_traversal_in_conversation_delete_stays_in_conversations() {
    let server = provider().await;

    let (status, body) = call(
        &server,
        Method::DELETE,
        "/api/chat/conversations/..%2FServices%2FISvictim",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_code(&body, "REMOTE_ERROR");
    assert_nothing_outside(&server, "/v1/Conversations/").await;
}

#[tokio::test]
async fn test_encoded_traversal_in_message_list_stays_in_conversations() {
    let server = provider().await;

    let (status, _) = call(
        &server,
        Method::GET,
        "/api/chat/conversations/..%2F..%2FServices%2FISvictim/messages",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_nothing_outside(&server, "/v1/Conversations/").await;
}

#[tokio::test]
async fn test_encoded_traversal_in_room_end_stays_in_rooms() {
    let server = provider().await;

    let (status, _) = call(
        &server,
        Method::POST,
        "/api/video/rooms/..%2FConversations%2FCH1/end",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_nothing_outside(&server, "/v1/Rooms/").await;
}

#[tokio::test]
async fn test_bare_dot_dot_sid_never_reaches_provider() {
    let server = provider().await;

    let (status, body) = call(&server, Method::GET, "/api/video/rooms/%2E%2E").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_code(&body, "NOT_FOUND");
    assert!(server.received_requests().await.unwrap().is_empty());
}
