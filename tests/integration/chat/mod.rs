//! Chat API integration tests: tokens, conversations, participants, messages

use axum::http::{Method, StatusCode};
use commlink_tokens::decode_access_token;
use commlink_twilio::{ConversationsApi, TwilioError};
use serde_json::json;

use crate::common::{
    assert_error_code, TestApp, ACCOUNT_SID, API_KEY_SECRET, API_KEY_SID, SERVICE_SID,
};

mod test_token {
    use super::*;

    #[tokio::test]
    async fn test_token_carries_identity_and_service_grant() {
        let app = TestApp::new();

        let (status, body) = app
            .post("/api/chat/token", json!({"identity": "alice"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["identity"], "alice");

        let claims = decode_access_token(body["token"].as_str().unwrap(), API_KEY_SECRET).unwrap();
        assert_eq!(claims.grants.identity, "alice");
        assert_eq!(claims.grants.chat.unwrap().service_sid, SERVICE_SID);
        assert_eq!(claims.iss, API_KEY_SID);
        assert_eq!(claims.sub, ACCOUNT_SID);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_token_needs_no_remote_call() {
        let app = TestApp::new();

        let (status, _) = app
            .post("/api/chat/token", json!({"identity": "alice"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(app.mock.connections().is_empty());
    }

    #[tokio::test]
    async fn test_token_rejects_missing_identity() {
        let app = TestApp::new();

        let (status, body) = app.post("/api/chat/token", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_code(&body, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_token_accepts_any_identity_string() {
        let app = TestApp::new();

        for identity in ["", "  spaced out  ", "Zoë <zoe@example.com>"] {
            let (status, body) = app
                .post("/api/chat/token", json!({"identity": identity}))
                .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["identity"], identity);
            let claims =
                decode_access_token(body["token"].as_str().unwrap(), API_KEY_SECRET).unwrap();
            assert_eq!(claims.grants.identity, identity);
        }
    }
}

mod test_conversations {
    use super::*;

    #[tokio::test]
    async fn test_create_then_fetch_conversation() {
        let app = TestApp::new();

        let (status, created) = app
            .post("/api/chat/conversations", json!({"friendly_name": "General"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["friendly_name"], "General");
        assert_eq!(created["state"], "active");
        let sid = created["sid"].as_str().unwrap();
        assert!(sid.starts_with("CH"));

        let (status, fetched) = app.get(&format!("/api/chat/conversations/{sid}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["sid"], sid);
        assert_eq!(fetched["friendly_name"], "General");
    }

    #[tokio::test]
    async fn test_create_conversation_without_name() {
        let app = TestApp::new();

        let (status, created) = app.post("/api/chat/conversations", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert!(created["friendly_name"].is_null());
    }

    #[tokio::test]
    async fn test_fetch_unknown_conversation_is_404() {
        let app = TestApp::new();

        let (status, body) = app.get("/api/chat/conversations/CHdoesnotexist").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_code(&body, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_is_capped_at_fifty() {
        let app = TestApp::new();
        for i in 0..60 {
            app.mock
                .create_conversation(Some(format!("room-{i}").as_str()))
                .await
                .unwrap();
        }

        let (status, body) = app.get("/api/chat/conversations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversations"].as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_delete_conversation() {
        let app = TestApp::new();
        let conversation = app.mock.create_conversation(Some("doomed")).await.unwrap();
        let uri = format!("/api/chat/conversations/{}", conversation.sid);

        let (status, body) = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Conversation deleted"}));

        let (status, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_conversation_is_remote_error() {
        let app = TestApp::new();

        let (status, body) = app
            .send(Method::DELETE, "/api/chat/conversations/CHmissing", None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_code(&body, "REMOTE_ERROR");
    }
}

mod test_participants {
    use super::*;

    #[tokio::test]
    async fn test_join_adds_participant() {
        let app = TestApp::new();
        let conversation = app.mock.create_conversation(Some("team")).await.unwrap();

        let (status, body) = app
            .post(
                "/api/chat/conversations/join",
                json!({"conversation_sid": conversation.sid, "identity": "alice"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversation_sid"], conversation.sid.as_str());
        assert_eq!(body["identity"], "alice");

        let (_, list) = app
            .get(&format!(
                "/api/chat/conversations/{}/participants",
                conversation.sid
            ))
            .await;
        let participants = list["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0]["identity"], "alice");
    }

    #[tokio::test]
    async fn test_joining_twice_directly_is_remote_error() {
        let app = TestApp::new();
        let conversation = app.mock.create_conversation(Some("team")).await.unwrap();
        let payload = json!({"conversation_sid": conversation.sid, "identity": "alice"});

        let (first, _) = app.post("/api/chat/conversations/join", payload.clone()).await;
        let (second, body) = app.post("/api/chat/conversations/join", payload).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_error_code(&body, "REMOTE_ERROR");
    }

    #[tokio::test]
    async fn test_join_by_name_creates_once_and_is_idempotent() {
        let app = TestApp::new();
        let payload = json!({"conversation_name": "standup", "identity": "alice"});

        let (status, first) = app
            .post("/api/chat/conversations/join-by-name", payload.clone())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["friendly_name"], "standup");

        let (status, second) = app
            .post("/api/chat/conversations/join-by-name", payload)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["sid"], first["sid"]);

        assert_eq!(app.mock.conversations().len(), 1);
        let participants = app
            .mock
            .list_participants(first["sid"].as_str().unwrap())
            .await
            .unwrap();
        assert_eq!(participants.len(), 1);
    }

    #[tokio::test]
    async fn test_join_by_name_reuses_existing_conversation() {
        let app = TestApp::new();
        let existing = app.mock.create_conversation(Some("standup")).await.unwrap();

        let (status, body) = app
            .post(
                "/api/chat/conversations/join-by-name",
                json!({"conversation_name": "standup", "identity": "bob"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sid"], existing.sid.as_str());
        assert_eq!(app.mock.conversations().len(), 1);
    }

    #[tokio::test]
    async fn test_join_by_name_tolerates_conflict() {
        let app = TestApp::new();
        app.mock.fail_operation(
            "create_participant",
            TwilioError::Api {
                status: 409,
                code: Some(50433),
                message: "Participant already exists".to_string(),
            },
        );

        let (status, body) = app
            .post(
                "/api/chat/conversations/join-by-name",
                json!({"conversation_name": "standup", "identity": "alice"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["friendly_name"], "standup");
    }

    #[tokio::test]
    async fn test_join_by_name_propagates_other_failures() {
        let app = TestApp::new();
        app.mock.fail_operation(
            "create_participant",
            TwilioError::Api {
                status: 500,
                code: None,
                message: "upstream exploded".to_string(),
            },
        );

        let (status, body) = app
            .post(
                "/api/chat/conversations/join-by-name",
                json!({"conversation_name": "standup", "identity": "alice"}),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_code(&body, "REMOTE_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("upstream exploded"));
    }
}

mod test_messages {
    use super::*;

    #[tokio::test]
    async fn test_send_then_list_messages() {
        let app = TestApp::new();
        let conversation = app.mock.create_conversation(Some("team")).await.unwrap();

        let (status, sent) = app
            .post(
                "/api/chat/messages",
                json!({
                    "conversation_sid": conversation.sid,
                    "author": "alice",
                    "body": "hello"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sent["conversation_sid"], conversation.sid.as_str());
        assert_eq!(sent["author"], "alice");
        assert_eq!(sent["body"], "hello");

        let (status, list) = app
            .get(&format!(
                "/api/chat/conversations/{}/messages",
                conversation.sid
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        let messages = list["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["sid"], sent["sid"]);
        assert_eq!(messages[0]["body"], "hello");
    }

    #[tokio::test]
    async fn test_list_messages_is_capped_at_one_hundred() {
        let app = TestApp::new();
        let conversation = app.mock.create_conversation(Some("busy")).await.unwrap();
        for i in 0..120 {
            app.mock
                .create_message(&conversation.sid, "bot", &format!("message {i}"))
                .await
                .unwrap();
        }

        let (_, list) = app
            .get(&format!(
                "/api/chat/conversations/{}/messages",
                conversation.sid
            ))
            .await;

        assert_eq!(list["messages"].as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_send_to_unknown_conversation_is_remote_error() {
        let app = TestApp::new();

        let (status, body) = app
            .post(
                "/api/chat/messages",
                json!({"conversation_sid": "CHmissing", "author": "a", "body": "b"}),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_code(&body, "REMOTE_ERROR");
    }
}
