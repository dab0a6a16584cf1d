//! Remote resource mirrors
//!
//! Field names follow the provider's JSON. None of these are owned locally;
//! states and statuses are reported as the provider returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Parse an RFC 3339 timestamp, mapping absent or malformed values to `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationState {
    Active,
    Inactive,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub sid: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: Option<ConversationState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub sid: String,
    pub conversation_sid: String,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sid: String,
    pub conversation_sid: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStatus {
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::InProgress => "in-progress",
            RoomStatus::Completed => "completed",
            RoomStatus::Failed => "failed",
            RoomStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomType {
    PeerToPeer,
    #[default]
    Group,
    GroupSmall,
    Go,
    #[serde(other)]
    Unknown,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::PeerToPeer => "peer-to-peer",
            RoomType::Group => "group",
            RoomType::GroupSmall => "group-small",
            RoomType::Go => "go",
            RoomType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub sid: String,
    #[serde(default)]
    pub unique_name: Option<String>,
    pub status: RoomStatus,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    /// Seconds; absent until the room ends
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomParticipantStatus {
    Connected,
    Disconnected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomParticipant {
    pub sid: String,
    pub room_sid: String,
    #[serde(default)]
    pub identity: Option<String>,
    pub status: RoomParticipantStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
}
