//! Room API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use commlink_common::{Error, Result, ValidatedJson};
use commlink_twilio::{Room, RoomParticipant, RoomParticipantStatus, RoomStatus, RoomType};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::VideoState;

/// Page cap for the room list endpoint
pub const ROOM_LIST_LIMIT: usize = 50;

/// Request for creating a room
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1))]
    pub room_name: String,
    #[serde(default)]
    pub room_type: RoomType,
}

/// Query params for listing rooms
#[derive(Debug, Deserialize)]
pub struct ListRoomsQuery {
    pub status: Option<RoomStatus>,
}

/// Room response DTO
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub sid: String,
    pub unique_name: Option<String>,
    pub status: RoomStatus,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub date_created: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
}

impl From<Room> for RoomResponse {
    fn from(r: Room) -> Self {
        Self {
            sid: r.sid,
            unique_name: r.unique_name,
            status: r.status,
            room_type: r.room_type,
            date_created: r.date_created,
            duration: r.duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomResponse>,
}

#[derive(Debug, Serialize)]
pub struct EndRoomResponse {
    pub sid: String,
    pub unique_name: Option<String>,
    pub status: RoomStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RoomParticipantResponse {
    pub sid: String,
    pub identity: Option<String>,
    pub status: RoomParticipantStatus,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<RoomParticipant> for RoomParticipantResponse {
    fn from(p: RoomParticipant) -> Self {
        Self {
            sid: p.sid,
            identity: p.identity,
            status: p.status,
            date_created: p.date_created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomParticipantListResponse {
    pub participants: Vec<RoomParticipantResponse>,
}

/// Create a new video room
pub async fn create_room(
    State(state): State<VideoState>,
    ValidatedJson(req): ValidatedJson<CreateRoomRequest>,
) -> Result<Json<RoomResponse>> {
    if req.room_type == RoomType::Unknown {
        return Err(Error::Validation(
            "room_type must be one of: peer-to-peer, group, group-small, go".to_string(),
        ));
    }

    let api = state.client()?;

    let room = api.create_room(&req.room_name, req.room_type).await?;

    tracing::info!(room_sid = %room.sid, room_name = %req.room_name, "Created room");
    Ok(Json(room.into()))
}

/// List rooms in a given status (in-progress by default)
pub async fn list_rooms(
    State(state): State<VideoState>,
    Query(query): Query<ListRoomsQuery>,
) -> Result<Json<RoomListResponse>> {
    let status = query.status.unwrap_or(RoomStatus::InProgress);
    if status == RoomStatus::Unknown {
        return Err(Error::Validation(
            "status must be one of: in-progress, completed, failed".to_string(),
        ));
    }

    let api = state.client()?;

    let rooms = api.list_rooms(status, ROOM_LIST_LIMIT).await?;

    Ok(Json(RoomListResponse {
        rooms: rooms.into_iter().map(Into::into).collect(),
    }))
}

/// Get a single room by SID
pub async fn get_room(
    State(state): State<VideoState>,
    Path(room_sid): Path<String>,
) -> Result<Json<RoomResponse>> {
    let api = state.client()?;

    let room = api
        .fetch_room(&room_sid)
        .await
        .map_err(|e| Error::NotFound(e.to_string()))?;

    Ok(Json(room.into()))
}

/// List every participant of a room
pub async fn list_room_participants(
    State(state): State<VideoState>,
    Path(room_sid): Path<String>,
) -> Result<Json<RoomParticipantListResponse>> {
    let api = state.client()?;

    let participants = api.list_room_participants(&room_sid).await?;

    Ok(Json(RoomParticipantListResponse {
        participants: participants.into_iter().map(Into::into).collect(),
    }))
}

/// End a room by moving it to `completed`
pub async fn end_room(
    State(state): State<VideoState>,
    Path(room_sid): Path<String>,
) -> Result<Json<EndRoomResponse>> {
    let api = state.client()?;

    let room = api
        .update_room_status(&room_sid, RoomStatus::Completed)
        .await?;

    tracing::info!(room_sid = %room.sid, "Ended room");
    Ok(Json(EndRoomResponse {
        sid: room.sid,
        unique_name: room.unique_name,
        status: room.status,
        message: "Room ended successfully".to_string(),
    }))
}
