//! Twilio REST Client Implementation
//!
//! Calls the conversations API (`{conversations_base_url}/v1/Conversations`)
//! and the video API (`{video_base_url}/v1/Rooms`) with HTTP basic auth.
//! Writes are form-encoded, reads are JSON.

use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use commlink_common::RestCredentials;

use crate::{
    Conversation, ConversationsApi, Message, Participant, Room, RoomParticipant, RoomStatus,
    RoomType, TwilioApi, TwilioConnector, TwilioError, VideoApi,
};

/// Page size used when a list is read to exhaustion
const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page the provider will serve
const MAX_PAGE_SIZE: usize = 1000;

/// Provider error body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<u32>,
    message: Option<String>,
}

/// `{base}/v1/{segments...}` with every segment percent-encoded as a single
/// path segment, so a SID can never climb out of its resource collection.
fn resource_url(base: &str, segments: &[&str]) -> Result<Url, TwilioError> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(TwilioError::InvalidSid(bad.to_string()));
    }

    let mut url = Url::parse(base)
        .map_err(|e| TwilioError::Configuration(format!("Invalid base URL {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| TwilioError::Configuration(format!("Base URL {base:?} cannot have a path")))?
        .pop_if_empty()
        .push("v1")
        .extend(segments);
    Ok(url)
}

/// Authenticated client for one set of REST credentials
pub struct TwilioClient {
    http: Client,
    credentials: RestCredentials,
    conversations_base_url: String,
    video_base_url: String,
}

impl TwilioClient {
    pub fn new(
        http: Client,
        credentials: RestCredentials,
        conversations_base_url: &str,
        video_base_url: &str,
    ) -> Self {
        Self {
            http,
            credentials,
            conversations_base_url: conversations_base_url.trim_end_matches('/').to_string(),
            video_base_url: video_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn conversations_url(&self, segments: &[&str]) -> Result<Url, TwilioError> {
        resource_url(&self.conversations_base_url, segments)
    }

    fn video_url(&self, segments: &[&str]) -> Result<Url, TwilioError> {
        resource_url(&self.video_base_url, segments)
    }

    /// Send with credentials attached, mapping non-2xx answers to `TwilioError::Api`
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, TwilioError> {
        let response = request
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .send()
            .await
            .map_err(|e| TwilioError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse {
                code,
                message: Some(message),
            }) => (code, message),
            Ok(ErrorResponse { code, message: None }) => (code, body),
            Err(_) => (None, body),
        };

        tracing::debug!(status = status.as_u16(), ?code, "Twilio API returned an error");

        Err(TwilioError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TwilioError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| TwilioError::Decode(format!("Failed to parse response: {}", e)))
    }

    /// Read a list resource, following `meta.next_page_url` until `limit`
    /// records are collected or the pages run out
    async fn list<T: DeserializeOwned>(
        &self,
        url: Url,
        filters: &[(&str, &str)],
        key: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, TwilioError> {
        let page_size = limit.map_or(DEFAULT_PAGE_SIZE, |l| l.clamp(1, MAX_PAGE_SIZE));

        let mut request = self
            .http
            .get(url)
            .query(filters)
            .query(&[("PageSize", page_size)]);
        let mut records: Vec<T> = Vec::new();

        loop {
            let page: Value = self.execute(request).await?;

            let batch = page
                .get(key)
                .cloned()
                .ok_or_else(|| TwilioError::Decode(format!("list response has no `{}`", key)))?;
            let batch: Vec<T> = serde_json::from_value(batch)
                .map_err(|e| TwilioError::Decode(format!("Failed to parse `{}`: {}", key, e)))?;
            records.extend(batch);

            if let Some(limit) = limit {
                if records.len() >= limit {
                    records.truncate(limit);
                    break;
                }
            }

            match page
                .pointer("/meta/next_page_url")
                .and_then(Value::as_str)
                .filter(|next| !next.is_empty())
            {
                Some(next) => request = self.http.get(next),
                None => break,
            }
        }

        Ok(records)
    }
}

#[async_trait::async_trait]
impl ConversationsApi for TwilioClient {
    async fn create_conversation(
        &self,
        friendly_name: Option<&str>,
    ) -> Result<Conversation, TwilioError> {
        let mut form = Vec::new();
        if let Some(name) = friendly_name {
            form.push(("FriendlyName", name));
        }

        let request = self
            .http
            .post(self.conversations_url(&["Conversations"])?)
            .form(&form);
        self.execute(request).await
    }

    async fn list_conversations(&self, limit: usize) -> Result<Vec<Conversation>, TwilioError> {
        self.list(
            self.conversations_url(&["Conversations"])?,
            &[],
            "conversations",
            Some(limit),
        )
        .await
    }

    async fn fetch_conversation(&self, sid: &str) -> Result<Conversation, TwilioError> {
        let request = self
            .http
            .get(self.conversations_url(&["Conversations", sid])?);
        self.execute(request).await
    }

    async fn delete_conversation(&self, sid: &str) -> Result<(), TwilioError> {
        let request = self
            .http
            .delete(self.conversations_url(&["Conversations", sid])?);
        self.send(request).await?;
        Ok(())
    }

    async fn create_participant(
        &self,
        conversation_sid: &str,
        identity: &str,
    ) -> Result<Participant, TwilioError> {
        let request = self
            .http
            .post(self.conversations_url(&["Conversations", conversation_sid, "Participants"])?)
            .form(&[("Identity", identity)]);
        self.execute(request).await
    }

    async fn list_participants(
        &self,
        conversation_sid: &str,
    ) -> Result<Vec<Participant>, TwilioError> {
        self.list(
            self.conversations_url(&["Conversations", conversation_sid, "Participants"])?,
            &[],
            "participants",
            None,
        )
        .await
    }

    async fn create_message(
        &self,
        conversation_sid: &str,
        author: &str,
        body: &str,
    ) -> Result<Message, TwilioError> {
        let request = self
            .http
            .post(self.conversations_url(&["Conversations", conversation_sid, "Messages"])?)
            .form(&[("Author", author), ("Body", body)]);
        self.execute(request).await
    }

    async fn list_messages(
        &self,
        conversation_sid: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TwilioError> {
        self.list(
            self.conversations_url(&["Conversations", conversation_sid, "Messages"])?,
            &[],
            "messages",
            Some(limit),
        )
        .await
    }
}

#[async_trait::async_trait]
impl VideoApi for TwilioClient {
    async fn create_room(
        &self,
        unique_name: &str,
        room_type: RoomType,
    ) -> Result<Room, TwilioError> {
        let request = self
            .http
            .post(self.video_url(&["Rooms"])?)
            .form(&[("UniqueName", unique_name), ("Type", room_type.as_str())]);
        self.execute(request).await
    }

    async fn list_rooms(&self, status: RoomStatus, limit: usize) -> Result<Vec<Room>, TwilioError> {
        self.list(
            self.video_url(&["Rooms"])?,
            &[("Status", status.as_str())],
            "rooms",
            Some(limit),
        )
        .await
    }

    async fn fetch_room(&self, sid: &str) -> Result<Room, TwilioError> {
        let request = self.http.get(self.video_url(&["Rooms", sid])?);
        self.execute(request).await
    }

    async fn update_room_status(
        &self,
        sid: &str,
        status: RoomStatus,
    ) -> Result<Room, TwilioError> {
        let request = self
            .http
            .post(self.video_url(&["Rooms", sid])?)
            .form(&[("Status", status.as_str())]);
        self.execute(request).await
    }

    async fn list_room_participants(
        &self,
        room_sid: &str,
    ) -> Result<Vec<RoomParticipant>, TwilioError> {
        self.list(
            self.video_url(&["Rooms", room_sid, "Participants"])?,
            &[],
            "participants",
            None,
        )
        .await
    }
}

/// Connector that shares one HTTP connection pool across per-request clients
#[derive(Debug, Clone)]
pub struct HttpConnector {
    http: Client,
    conversations_base_url: String,
    video_base_url: String,
}

impl HttpConnector {
    pub fn new(conversations_base_url: String, video_base_url: String) -> Self {
        Self {
            http: Client::new(),
            conversations_base_url,
            video_base_url,
        }
    }
}

impl TwilioConnector for HttpConnector {
    fn connect(&self, credentials: RestCredentials) -> Box<dyn TwilioApi> {
        Box::new(TwilioClient::new(
            self.http.clone(),
            credentials,
            &self.conversations_base_url,
            &self.video_base_url,
        ))
    }
}
