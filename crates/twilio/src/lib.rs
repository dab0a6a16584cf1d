//! Commlink Remote Client
//!
//! Talks to the provider's conversations and video REST APIs:
//! - `TwilioClient`: reqwest implementation authenticated per request
//! - `MockTwilio`: in-memory provider for tests and local development
//! - `TwilioConnectorFactory`: picks the implementation from configuration

pub mod client;
pub mod mock;
pub mod resources;

use std::sync::Arc;

use commlink_common::{Config, RestCredentials};
use thiserror::Error;

pub use client::{HttpConnector, TwilioClient};
pub use mock::MockTwilio;
pub use resources::{
    Conversation, ConversationState, Message, Participant, Room, RoomParticipant,
    RoomParticipantStatus, RoomStatus, RoomType,
};

/// Provider error code for "participant already exists" on a conversation
pub const PARTICIPANT_EXISTS_CODE: u32 = 50433;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TwilioError {
    #[error("Twilio configuration error: {0}")]
    Configuration(String),

    #[error("request failed: {0}")]
    Request(String),

    /// A caller-supplied SID that cannot name a single path segment
    #[error("invalid resource sid: {0:?}")]
    InvalidSid(String),

    /// Non-2xx answer from the provider
    #[error("HTTP {status} error: {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl TwilioError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TwilioError::Api { status: 404, .. })
    }

    /// The participant being added is already a member
    pub fn is_already_exists(&self) -> bool {
        match self {
            TwilioError::Api { status, code, .. } => {
                *status == 409 || *code == Some(PARTICIPANT_EXISTS_CODE)
            }
            _ => false,
        }
    }
}

impl From<TwilioError> for commlink_common::Error {
    fn from(err: TwilioError) -> Self {
        commlink_common::Error::Remote(err.to_string())
    }
}

/// Conversations (chat) operations
#[async_trait::async_trait]
pub trait ConversationsApi: Send + Sync {
    async fn create_conversation(
        &self,
        friendly_name: Option<&str>,
    ) -> Result<Conversation, TwilioError>;

    async fn list_conversations(&self, limit: usize) -> Result<Vec<Conversation>, TwilioError>;

    async fn fetch_conversation(&self, sid: &str) -> Result<Conversation, TwilioError>;

    async fn delete_conversation(&self, sid: &str) -> Result<(), TwilioError>;

    async fn create_participant(
        &self,
        conversation_sid: &str,
        identity: &str,
    ) -> Result<Participant, TwilioError>;

    /// Every participant, across all pages
    async fn list_participants(
        &self,
        conversation_sid: &str,
    ) -> Result<Vec<Participant>, TwilioError>;

    async fn create_message(
        &self,
        conversation_sid: &str,
        author: &str,
        body: &str,
    ) -> Result<Message, TwilioError>;

    async fn list_messages(
        &self,
        conversation_sid: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TwilioError>;
}

/// Video room operations
#[async_trait::async_trait]
pub trait VideoApi: Send + Sync {
    async fn create_room(&self, unique_name: &str, room_type: RoomType)
        -> Result<Room, TwilioError>;

    async fn list_rooms(&self, status: RoomStatus, limit: usize)
        -> Result<Vec<Room>, TwilioError>;

    async fn fetch_room(&self, sid: &str) -> Result<Room, TwilioError>;

    async fn update_room_status(&self, sid: &str, status: RoomStatus)
        -> Result<Room, TwilioError>;

    /// Every participant, across all pages
    async fn list_room_participants(
        &self,
        room_sid: &str,
    ) -> Result<Vec<RoomParticipant>, TwilioError>;
}

/// Full remote surface
pub trait TwilioApi: ConversationsApi + VideoApi {}

impl<T: ConversationsApi + VideoApi> TwilioApi for T {}

/// Builds an authenticated client for one request
pub trait TwilioConnector: Send + Sync {
    fn connect(&self, credentials: RestCredentials) -> Box<dyn TwilioApi>;
}

/// Remote client configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Provider (twilio, mock)
    pub provider: String,
    pub conversations_base_url: String,
    pub video_base_url: String,
}

impl From<&Config> for TwilioConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: config.provider.clone(),
            conversations_base_url: config.conversations_base_url.clone(),
            video_base_url: config.video_base_url.clone(),
        }
    }
}

/// Factory for creating TwilioConnector implementations
pub struct TwilioConnectorFactory;

impl TwilioConnectorFactory {
    pub fn create(config: TwilioConfig) -> Result<Arc<dyn TwilioConnector>, TwilioError> {
        match config.provider.as_str() {
            "twilio" => {
                tracing::info!(
                    conversations = %config.conversations_base_url,
                    video = %config.video_base_url,
                    "Creating Twilio REST connector"
                );
                Ok(Arc::new(HttpConnector::new(
                    config.conversations_base_url,
                    config.video_base_url,
                )))
            }
            "mock" => {
                tracing::info!("Creating in-memory Twilio connector");
                Ok(Arc::new(MockTwilio::new()))
            }
            provider => Err(TwilioError::Configuration(format!(
                "Unknown Twilio provider: {}. Supported providers: twilio, mock",
                provider
            ))),
        }
    }
}
