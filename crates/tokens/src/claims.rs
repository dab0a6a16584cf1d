//! Access token claims and grants

use serde::{Deserialize, Serialize};

/// Claims carried by a provider access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Token id: `<api_key_sid>-<iat>`
    pub jti: String,
    /// Issuer (API key sid)
    pub iss: String,
    /// Subject (account sid)
    pub sub: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    pub grants: Grants,
}

/// Identity plus the single capability the token allows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grants {
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatGrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoGrant>,
}

/// Access to one conversation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatGrant {
    pub service_sid: String,
}

/// Access to one named video room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoGrant {
    pub room: String,
}
