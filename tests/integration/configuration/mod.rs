//! Missing-secret behaviour: every operation fails with 500 before any
//! provider call when the secrets it needs are absent.

use axum::http::{Method, StatusCode};
use commlink_common::Credentials;
use serde_json::json;

use crate::common::{assert_error_code, full_credentials, TestApp};

fn assert_not_configured(status: StatusCode, body: &serde_json::Value, message: &str) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_code(body, "CONFIGURATION_ERROR");
    assert_eq!(body["error"]["message"], message);
}

#[tokio::test]
async fn test_every_rest_route_fails_without_credentials() {
    let app = TestApp::with_credentials(Credentials::default());

    let calls = [
        app.get("/api/chat/conversations").await,
        app.post("/api/chat/conversations", json!({"friendly_name": "x"})).await,
        app.get("/api/chat/conversations/CH1").await,
        app.send(Method::DELETE, "/api/chat/conversations/CH1", None).await,
        app.post(
            "/api/chat/conversations/join",
            json!({"conversation_sid": "CH1", "identity": "alice"}),
        )
        .await,
        app.get("/api/chat/conversations/CH1/participants").await,
        app.get("/api/chat/conversations/CH1/messages").await,
        app.post(
            "/api/chat/conversations/join-by-name",
            json!({"conversation_name": "x", "identity": "alice"}),
        )
        .await,
        app.post(
            "/api/chat/messages",
            json!({"conversation_sid": "CH1", "author": "a", "body": "b"}),
        )
        .await,
        app.get("/api/video/rooms").await,
        app.post("/api/video/rooms", json!({"room_name": "x"})).await,
        app.get("/api/video/rooms/RM1").await,
        app.get("/api/video/rooms/RM1/participants").await,
        app.post("/api/video/rooms/RM1/end", json!({})).await,
    ];

    for (status, body) in &calls {
        assert_not_configured(*status, body, "Twilio credentials not configured");
    }
    assert!(app.mock.connections().is_empty());
}

#[tokio::test]
async fn test_auth_token_alone_is_not_enough() {
    let app = TestApp::with_credentials(Credentials {
        auth_token: None,
        ..full_credentials()
    });

    let (status, body) = app.get("/api/video/rooms").await;

    assert_not_configured(status, &body, "Twilio credentials not configured");
    assert!(app.mock.connections().is_empty());
}

#[tokio::test]
async fn test_video_token_needs_api_key() {
    let app = TestApp::with_credentials(Credentials {
        api_key_secret: None,
        ..full_credentials()
    });

    let (status, body) = app
        .post(
            "/api/video/token",
            json!({"identity": "alice", "room_name": "standup"}),
        )
        .await;

    assert_not_configured(status, &body, "Twilio credentials not fully configured");
}

#[tokio::test]
async fn test_chat_token_needs_service_sid() {
    let app = TestApp::with_credentials(Credentials {
        conversations_service_sid: None,
        ..full_credentials()
    });

    let (status, body) = app
        .post("/api/chat/token", json!({"identity": "alice"}))
        .await;

    assert_not_configured(status, &body, "Twilio credentials not fully configured");
}

#[tokio::test]
async fn test_video_token_works_without_rest_credentials() {
    let app = TestApp::with_credentials(Credentials {
        auth_token: None,
        conversations_service_sid: None,
        ..full_credentials()
    });

    let (status, _) = app
        .post(
            "/api/video/token",
            json!({"identity": "alice", "room_name": "standup"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_does_not_need_credentials() {
    let app = TestApp::with_credentials(Credentials::default());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "up"}));
}
