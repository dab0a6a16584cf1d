//! Route definitions for Video domain API
//!
//! Paths are relative; the composition root nests them under `/api/video`.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{rooms, token};
use super::middleware::VideoState;

/// Create room routes
fn room_routes() -> Router<VideoState> {
    Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/{room_sid}", get(rooms::get_room))
        .route(
            "/rooms/{room_sid}/participants",
            get(rooms::list_room_participants),
        )
        .route("/rooms/{room_sid}/end", post(rooms::end_room))
}

/// Create all Video domain API routes
pub fn routes() -> Router<VideoState> {
    Router::new()
        .route("/token", post(token::issue_token))
        .merge(room_routes())
}
