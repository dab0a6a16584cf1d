//! In-memory Twilio
//!
//! Behaves like the remote provider closely enough for handler tests and
//! local development: SIDs carry the provider prefixes, unknown SIDs are
//! 404s, duplicate participants are 409s, and lists honour limits.
//! Thread-safe via `Arc<Mutex<>>`; clones share one store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use commlink_common::RestCredentials;

use crate::{
    Conversation, ConversationState, ConversationsApi, Message, Participant, Room,
    RoomParticipant, RoomParticipantStatus, RoomStatus, RoomType, TwilioApi, TwilioConnector,
    TwilioError, VideoApi, PARTICIPANT_EXISTS_CODE,
};

/// Provider error code for a duplicate in-progress room name
pub const ROOM_EXISTS_CODE: u32 = 53113;

const NOT_FOUND_CODE: u32 = 20404;

fn new_sid(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}

fn not_found(resource: &str) -> TwilioError {
    TwilioError::Api {
        status: 404,
        code: Some(NOT_FOUND_CODE),
        message: format!("The requested resource {} was not found", resource),
    }
}

#[derive(Debug, Default)]
struct Store {
    conversations: Vec<Conversation>,
    participants: HashMap<String, Vec<Participant>>,
    messages: HashMap<String, Vec<Message>>,
    rooms: Vec<Room>,
    room_participants: HashMap<String, Vec<RoomParticipant>>,
    connections: Vec<RestCredentials>,
    failures: HashMap<&'static str, TwilioError>,
}

/// In-memory provider with call recording and failure injection
#[derive(Debug, Clone, Default)]
pub struct MockTwilio {
    store: Arc<Mutex<Store>>,
}

impl MockTwilio {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .expect("mock store lock poisoned")
    }

    /// Return an injected failure for `operation`, if any
    fn check(&self, operation: &'static str) -> Result<(), TwilioError> {
        match self.store().failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Make every call to `operation` (a trait method name) fail with `error`
    pub fn fail_operation(&self, operation: &'static str, error: TwilioError) {
        self.store().failures.insert(operation, error);
    }

    /// Credentials of every client handed out so far
    pub fn connections(&self) -> Vec<RestCredentials> {
        self.store().connections.clone()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.store().conversations.clone()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.store().rooms.clone()
    }

    /// Simulate a client joining a room over the media SDK
    pub fn seed_room_participant(&self, room_sid: &str, identity: &str) -> RoomParticipant {
        let participant = RoomParticipant {
            sid: new_sid("PA"),
            room_sid: room_sid.to_string(),
            identity: Some(identity.to_string()),
            status: RoomParticipantStatus::Connected,
            date_created: Some(Utc::now()),
        };
        self.store()
            .room_participants
            .entry(room_sid.to_string())
            .or_default()
            .push(participant.clone());
        participant
    }

    /// Clear all resources, recorded connections, and injected failures
    pub fn reset(&self) {
        *self.store() = Store::default();
    }
}

#[async_trait::async_trait]
impl ConversationsApi for MockTwilio {
    async fn create_conversation(
        &self,
        friendly_name: Option<&str>,
    ) -> Result<Conversation, TwilioError> {
        self.check("create_conversation")?;
        let conversation = Conversation {
            sid: new_sid("CH"),
            friendly_name: friendly_name.map(str::to_string),
            date_created: Some(Utc::now()),
            state: Some(ConversationState::Active),
        };
        tracing::debug!(sid = %conversation.sid, "Mock Twilio: created conversation");
        self.store().conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn list_conversations(&self, limit: usize) -> Result<Vec<Conversation>, TwilioError> {
        self.check("list_conversations")?;
        Ok(self
            .store()
            .conversations
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_conversation(&self, sid: &str) -> Result<Conversation, TwilioError> {
        self.check("fetch_conversation")?;
        self.store()
            .conversations
            .iter()
            .find(|c| c.sid == sid)
            .cloned()
            .ok_or_else(|| not_found(&format!("/Conversations/{}", sid)))
    }

    async fn delete_conversation(&self, sid: &str) -> Result<(), TwilioError> {
        self.check("delete_conversation")?;
        let mut store = self.store();
        let before = store.conversations.len();
        store.conversations.retain(|c| c.sid != sid);
        if store.conversations.len() == before {
            return Err(not_found(&format!("/Conversations/{}", sid)));
        }
        store.participants.remove(sid);
        store.messages.remove(sid);
        Ok(())
    }

    async fn create_participant(
        &self,
        conversation_sid: &str,
        identity: &str,
    ) -> Result<Participant, TwilioError> {
        self.check("create_participant")?;
        let mut store = self.store();
        if !store.conversations.iter().any(|c| c.sid == conversation_sid) {
            return Err(not_found(&format!("/Conversations/{}", conversation_sid)));
        }

        let members = store
            .participants
            .entry(conversation_sid.to_string())
            .or_default();
        if members
            .iter()
            .any(|p| p.identity.as_deref() == Some(identity))
        {
            return Err(TwilioError::Api {
                status: 409,
                code: Some(PARTICIPANT_EXISTS_CODE),
                message: "A participant with the provided identity already exists".to_string(),
            });
        }

        let participant = Participant {
            sid: new_sid("MB"),
            conversation_sid: conversation_sid.to_string(),
            identity: Some(identity.to_string()),
            date_created: Some(Utc::now()),
        };
        members.push(participant.clone());
        Ok(participant)
    }

    async fn list_participants(
        &self,
        conversation_sid: &str,
    ) -> Result<Vec<Participant>, TwilioError> {
        self.check("list_participants")?;
        let store = self.store();
        if !store.conversations.iter().any(|c| c.sid == conversation_sid) {
            return Err(not_found(&format!("/Conversations/{}", conversation_sid)));
        }
        Ok(store
            .participants
            .get(conversation_sid)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_message(
        &self,
        conversation_sid: &str,
        author: &str,
        body: &str,
    ) -> Result<Message, TwilioError> {
        self.check("create_message")?;
        let mut store = self.store();
        if !store.conversations.iter().any(|c| c.sid == conversation_sid) {
            return Err(not_found(&format!("/Conversations/{}", conversation_sid)));
        }

        let message = Message {
            sid: new_sid("IM"),
            conversation_sid: conversation_sid.to_string(),
            author: Some(author.to_string()),
            body: Some(body.to_string()),
            date_created: Some(Utc::now()),
        };
        store
            .messages
            .entry(conversation_sid.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_sid: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TwilioError> {
        self.check("list_messages")?;
        let store = self.store();
        if !store.conversations.iter().any(|c| c.sid == conversation_sid) {
            return Err(not_found(&format!("/Conversations/{}", conversation_sid)));
        }
        Ok(store
            .messages
            .get(conversation_sid)
            .map(|messages| messages.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl VideoApi for MockTwilio {
    async fn create_room(
        &self,
        unique_name: &str,
        room_type: RoomType,
    ) -> Result<Room, TwilioError> {
        self.check("create_room")?;
        if room_type == RoomType::Unknown {
            return Err(TwilioError::Api {
                status: 400,
                code: None,
                message: "Invalid room type".to_string(),
            });
        }

        let mut store = self.store();
        if store.rooms.iter().any(|r| {
            r.status == RoomStatus::InProgress && r.unique_name.as_deref() == Some(unique_name)
        }) {
            return Err(TwilioError::Api {
                status: 400,
                code: Some(ROOM_EXISTS_CODE),
                message: "Room exists".to_string(),
            });
        }

        let room = Room {
            sid: new_sid("RM"),
            unique_name: Some(unique_name.to_string()),
            status: RoomStatus::InProgress,
            room_type,
            date_created: Some(Utc::now()),
            duration: None,
        };
        store.rooms.push(room.clone());
        Ok(room)
    }

    async fn list_rooms(&self, status: RoomStatus, limit: usize) -> Result<Vec<Room>, TwilioError> {
        self.check("list_rooms")?;
        Ok(self
            .store()
            .rooms
            .iter()
            .filter(|r| r.status == status)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_room(&self, sid: &str) -> Result<Room, TwilioError> {
        self.check("fetch_room")?;
        self.store()
            .rooms
            .iter()
            .find(|r| r.sid == sid)
            .cloned()
            .ok_or_else(|| not_found(&format!("/Rooms/{}", sid)))
    }

    async fn update_room_status(
        &self,
        sid: &str,
        status: RoomStatus,
    ) -> Result<Room, TwilioError> {
        self.check("update_room_status")?;
        let mut store = self.store();
        let room = store
            .rooms
            .iter_mut()
            .find(|r| r.sid == sid)
            .ok_or_else(|| not_found(&format!("/Rooms/{}", sid)))?;

        if room.status == RoomStatus::InProgress && status == RoomStatus::Completed {
            room.duration = room
                .date_created
                .map(|created| (Utc::now() - created).num_seconds());
        }
        room.status = status;
        let room = room.clone();

        if status == RoomStatus::Completed {
            if let Some(participants) = store.room_participants.get_mut(sid) {
                for p in participants.iter_mut() {
                    p.status = RoomParticipantStatus::Disconnected;
                }
            }
        }

        Ok(room)
    }

    async fn list_room_participants(
        &self,
        room_sid: &str,
    ) -> Result<Vec<RoomParticipant>, TwilioError> {
        self.check("list_room_participants")?;
        let store = self.store();
        if !store.rooms.iter().any(|r| r.sid == room_sid) {
            return Err(not_found(&format!("/Rooms/{}", room_sid)));
        }
        Ok(store
            .room_participants
            .get(room_sid)
            .cloned()
            .unwrap_or_default())
    }
}

impl TwilioConnector for MockTwilio {
    fn connect(&self, credentials: RestCredentials) -> Box<dyn TwilioApi> {
        self.store().connections.push(credentials);
        Box::new(self.clone())
    }
}
