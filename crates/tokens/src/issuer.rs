//! Access token signing and decoding

use commlink_common::SigningCredentials;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{AccessTokenClaims, ChatGrant, Grants, VideoGrant};
use crate::error::TokenError;

/// Fixed validity of every issued token
pub const TOKEN_TTL_SECS: u64 = 3600;

/// JWT `cty` header the provider expects on access tokens
pub const CONTENT_TYPE: &str = "twilio-fpa;v=1";

/// An unsigned access token for one identity and one grant
#[derive(Debug, Clone)]
pub struct AccessToken<'a> {
    credentials: &'a SigningCredentials,
    grants: Grants,
}

impl<'a> AccessToken<'a> {
    /// Token granting access to a conversation service
    pub fn chat(
        credentials: &'a SigningCredentials,
        identity: impl Into<String>,
        service_sid: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            grants: Grants {
                identity: identity.into(),
                chat: Some(ChatGrant {
                    service_sid: service_sid.into(),
                }),
                video: None,
            },
        }
    }

    /// Token granting access to a single video room
    pub fn video(
        credentials: &'a SigningCredentials,
        identity: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            grants: Grants {
                identity: identity.into(),
                chat: None,
                video: Some(VideoGrant { room: room.into() }),
            },
        }
    }

    /// Claims for a token issued at `now` (unix seconds)
    pub fn claims_at(&self, now: u64) -> AccessTokenClaims {
        AccessTokenClaims {
            jti: format!("{}-{}", self.credentials.api_key_sid, now),
            iss: self.credentials.api_key_sid.clone(),
            sub: self.credentials.account_sid.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            grants: self.grants.clone(),
        }
    }

    /// Sign the token as of the current time
    pub fn to_jwt(&self) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.to_jwt_at(now)
    }

    /// Sign the token as if issued at `now` (unix seconds)
    pub fn to_jwt_at(&self, now: u64) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.cty = Some(CONTENT_TYPE.to_string());

        let key = EncodingKey::from_secret(self.credentials.api_key_secret.as_bytes());
        let token =
            encode(&header, &self.claims_at(now), &key).map_err(TokenError::Signing)?;

        tracing::debug!(
            identity = %self.grants.identity,
            api_key_sid = %self.credentials.api_key_sid,
            "Issued access token"
        );

        Ok(token)
    }
}

/// Verify signature and expiry, returning the embedded claims
pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<AccessTokenClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Access token validation failed");
        TokenError::Invalid(e)
    })?;

    Ok(data.claims)
}
