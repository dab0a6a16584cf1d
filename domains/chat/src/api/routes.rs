//! Route definitions for Chat domain API
//!
//! Paths are relative; the composition root nests them under `/api/chat`.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{conversations, messages, token};
use super::middleware::ChatState;

/// Create conversation and participant routes
fn conversation_routes() -> Router<ChatState> {
    Router::new()
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route("/conversations/join", post(conversations::join_conversation))
        .route(
            "/conversations/join-by-name",
            post(conversations::join_by_name),
        )
        .route(
            "/conversations/{conversation_sid}",
            get(conversations::get_conversation).delete(conversations::delete_conversation),
        )
        .route(
            "/conversations/{conversation_sid}/participants",
            get(conversations::list_participants),
        )
}

/// Create message routes
fn message_routes() -> Router<ChatState> {
    Router::new()
        .route("/messages", post(messages::send_message))
        .route(
            "/conversations/{conversation_sid}/messages",
            get(messages::list_messages),
        )
}

/// Create all Chat domain API routes
pub fn routes() -> Router<ChatState> {
    Router::new()
        .route("/token", post(token::issue_token))
        .merge(conversation_routes())
        .merge(message_routes())
}
