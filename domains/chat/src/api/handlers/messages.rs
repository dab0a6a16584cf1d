//! Message API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use commlink_common::{Result, ValidatedJson};
use commlink_twilio::Message;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ChatState;

/// Page cap for the message list endpoint
pub const MESSAGE_LIST_LIMIT: usize = 100;

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    pub conversation_sid: String,
    pub author: String,
    pub body: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub sid: String,
    pub conversation_sid: String,
    pub author: Option<String>,
    pub body: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            sid: m.sid,
            conversation_sid: m.conversation_sid,
            author: m.author,
            body: m.body,
            date_created: m.date_created,
        }
    }
}

/// Message as listed under a conversation
#[derive(Debug, Serialize)]
pub struct MessageSummary {
    pub sid: String,
    pub author: Option<String>,
    pub body: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<Message> for MessageSummary {
    fn from(m: Message) -> Self {
        Self {
            sid: m.sid,
            author: m.author,
            body: m.body,
            date_created: m.date_created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageSummary>,
}

/// Send a message to a conversation
pub async fn send_message(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<Json<MessageResponse>> {
    let api = state.client()?;

    let message = api
        .create_message(&req.conversation_sid, &req.author, &req.body)
        .await?;

    tracing::debug!(
        conversation_sid = %req.conversation_sid,
        message_sid = %message.sid,
        "Sent message"
    );
    Ok(Json(message.into()))
}

/// List the first page of messages in a conversation
pub async fn list_messages(
    State(state): State<ChatState>,
    Path(conversation_sid): Path<String>,
) -> Result<Json<MessageListResponse>> {
    let api = state.client()?;

    let messages = api
        .list_messages(&conversation_sid, MESSAGE_LIST_LIMIT)
        .await?;

    Ok(Json(MessageListResponse {
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}
