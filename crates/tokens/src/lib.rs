//! Access token issuance for Commlink
//!
//! Mints HS256 access tokens signed with the provider API key pair. Each token
//! carries the bearer identity and exactly one capability grant, either a
//! conversation-service grant or a single video room grant.

mod claims;
mod error;
mod issuer;

pub use claims::{AccessTokenClaims, ChatGrant, Grants, VideoGrant};
pub use error::TokenError;
pub use issuer::{decode_access_token, AccessToken, CONTENT_TYPE, TOKEN_TTL_SECS};
