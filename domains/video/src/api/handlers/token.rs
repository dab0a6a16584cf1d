//! Video access token handler

use axum::{extract::State, Json};
use commlink_common::{Result, ValidatedJson};
use commlink_tokens::AccessToken;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::VideoState;

/// Request for a room-scoped access token
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    /// Passed through as-is; any string is a valid identity
    pub identity: String,
    #[validate(length(min = 1))]
    pub room_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub identity: String,
    pub room_name: String,
}

/// Mint a token that lets `identity` join `room_name`
pub async fn issue_token(
    State(state): State<VideoState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let signing = state.credentials.signing()?;

    let token =
        AccessToken::video(&signing, req.identity.as_str(), req.room_name.as_str()).to_jwt()?;

    tracing::info!(
        identity = %req.identity,
        room_name = %req.room_name,
        "Issued video access token"
    );

    Ok(Json(TokenResponse {
        token,
        identity: req.identity,
        room_name: req.room_name,
    }))
}
