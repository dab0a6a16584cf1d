//! Conversation and participant API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use commlink_common::{Error, Result, ValidatedJson};
use commlink_twilio::{Conversation, ConversationState, Participant};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ChatState;

/// Page cap for the conversation list endpoint
pub const CONVERSATION_LIST_LIMIT: usize = 50;

/// How many conversations join-by-name searches for a matching name
pub const JOIN_SEARCH_LIMIT: usize = 100;

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// Request for adding a participant to a known conversation
#[derive(Debug, Deserialize, Validate)]
pub struct JoinConversationRequest {
    #[validate(length(min = 1))]
    pub conversation_sid: String,
    #[validate(length(min = 1))]
    pub identity: String,
}

/// Request for joining (or creating) a conversation by friendly name
#[derive(Debug, Deserialize, Validate)]
pub struct JoinByNameRequest {
    #[validate(length(min = 1))]
    pub conversation_name: String,
    #[validate(length(min = 1))]
    pub identity: String,
}

/// Conversation response DTO
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub sid: String,
    pub friendly_name: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub state: Option<ConversationState>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            sid: c.sid,
            friendly_name: c.friendly_name,
            date_created: c.date_created,
            state: c.state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteConversationResponse {
    pub success: bool,
    pub message: String,
}

/// Participant as returned by a direct join
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub sid: String,
    pub conversation_sid: String,
    pub identity: Option<String>,
}

impl From<Participant> for JoinResponse {
    fn from(p: Participant) -> Self {
        Self {
            sid: p.sid,
            conversation_sid: p.conversation_sid,
            identity: p.identity,
        }
    }
}

/// Participant as listed under a conversation
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub sid: String,
    pub identity: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            sid: p.sid,
            identity: p.identity,
            date_created: p.date_created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParticipantListResponse {
    pub participants: Vec<ParticipantResponse>,
}

/// Create a new conversation
pub async fn create_conversation(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<Json<ConversationResponse>> {
    let api = state.client()?;

    let conversation = api
        .create_conversation(req.friendly_name.as_deref())
        .await?;

    tracing::info!(conversation_sid = %conversation.sid, "Created conversation");
    Ok(Json(conversation.into()))
}

/// List the first page of conversations
pub async fn list_conversations(
    State(state): State<ChatState>,
) -> Result<Json<ConversationListResponse>> {
    let api = state.client()?;

    let conversations = api.list_conversations(CONVERSATION_LIST_LIMIT).await?;

    Ok(Json(ConversationListResponse {
        conversations: conversations.into_iter().map(Into::into).collect(),
    }))
}

/// Get a single conversation by SID
pub async fn get_conversation(
    State(state): State<ChatState>,
    Path(conversation_sid): Path<String>,
) -> Result<Json<ConversationResponse>> {
    let api = state.client()?;

    let conversation = api
        .fetch_conversation(&conversation_sid)
        .await
        .map_err(|e| Error::NotFound(e.to_string()))?;

    Ok(Json(conversation.into()))
}

/// Delete a conversation
pub async fn delete_conversation(
    State(state): State<ChatState>,
    Path(conversation_sid): Path<String>,
) -> Result<Json<DeleteConversationResponse>> {
    let api = state.client()?;

    api.delete_conversation(&conversation_sid).await?;

    tracing::info!(conversation_sid = %conversation_sid, "Deleted conversation");
    Ok(Json(DeleteConversationResponse {
        success: true,
        message: "Conversation deleted".to_string(),
    }))
}

/// Add a participant to a conversation
pub async fn join_conversation(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<JoinConversationRequest>,
) -> Result<Json<JoinResponse>> {
    let api = state.client()?;

    let participant = api
        .create_participant(&req.conversation_sid, &req.identity)
        .await?;

    tracing::info!(
        conversation_sid = %req.conversation_sid,
        identity = %req.identity,
        "Added participant"
    );
    Ok(Json(participant.into()))
}

/// Find a conversation by friendly name (creating it if absent), then add the participant.
///
/// Only an "already a participant" answer from the provider is treated as
/// success when adding; every other failure is returned to the caller.
pub async fn join_by_name(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<JoinByNameRequest>,
) -> Result<Json<ConversationResponse>> {
    let api = state.client()?;

    let existing = api
        .list_conversations(JOIN_SEARCH_LIMIT)
        .await?
        .into_iter()
        .find(|c| c.friendly_name.as_deref() == Some(req.conversation_name.as_str()));

    let conversation = match existing {
        Some(conversation) => conversation,
        None => {
            let created = api
                .create_conversation(Some(req.conversation_name.as_str()))
                .await?;
            tracing::info!(
                conversation_sid = %created.sid,
                conversation_name = %req.conversation_name,
                "Created conversation for join-by-name"
            );
            created
        }
    };

    match api
        .create_participant(&conversation.sid, &req.identity)
        .await
    {
        Ok(_) => {
            tracing::info!(
                conversation_sid = %conversation.sid,
                identity = %req.identity,
                "Added participant"
            );
        }
        Err(e) if e.is_already_exists() => {
            tracing::info!(
                conversation_sid = %conversation.sid,
                identity = %req.identity,
                "Participant already in conversation"
            );
        }
        Err(e) => {
            tracing::warn!(
                conversation_sid = %conversation.sid,
                identity = %req.identity,
                error = %e,
                "Failed to add participant"
            );
            return Err(e.into());
        }
    }

    Ok(Json(conversation.into()))
}

/// List every participant in a conversation
pub async fn list_participants(
    State(state): State<ChatState>,
    Path(conversation_sid): Path<String>,
) -> Result<Json<ParticipantListResponse>> {
    let api = state.client()?;

    let participants = api.list_participants(&conversation_sid).await?;

    Ok(Json(ParticipantListResponse {
        participants: participants.into_iter().map(Into::into).collect(),
    }))
}
