//! Chat access token handler

use axum::{extract::State, Json};
use commlink_common::{Result, ValidatedJson};
use commlink_tokens::AccessToken;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ChatState;

/// Request for a chat access token
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    /// Passed through as-is; any string is a valid identity
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub identity: String,
}

/// Mint a token granting the conversation service to `identity`
pub async fn issue_token(
    State(state): State<ChatState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let (signing, service_sid) = state.credentials.chat_signing()?;

    let token = AccessToken::chat(&signing, req.identity.as_str(), service_sid).to_jwt()?;

    tracing::info!(identity = %req.identity, "Issued chat access token");

    Ok(Json(TokenResponse {
        token,
        identity: req.identity,
    }))
}
