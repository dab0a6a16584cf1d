//! Provider credential resolution
//!
//! Secrets are optional at startup. Each operation asks for the subset it
//! needs and gets a `Configuration` error (HTTP 500) if any piece is absent,
//! before any remote call is attempted.

use crate::error::{Error, Result};

const NOT_CONFIGURED: &str = "Twilio credentials not configured";
const NOT_FULLY_CONFIGURED: &str = "Twilio credentials not fully configured";

/// Raw provider secrets as read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub api_key_sid: Option<String>,
    pub api_key_secret: Option<String>,
    pub conversations_service_sid: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_sid", &self.api_key_sid)
            .field(
                "api_key_secret",
                &self.api_key_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("conversations_service_sid", &self.conversations_service_sid)
            .finish()
    }
}

/// Account sid + auth token, used to authenticate REST calls
#[derive(Clone, PartialEq, Eq)]
pub struct RestCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for RestCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// Account sid + API key pair, used to sign access tokens
#[derive(Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    pub account_sid: String,
    pub api_key_sid: String,
    pub api_key_secret: String,
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("account_sid", &self.account_sid)
            .field("api_key_sid", &self.api_key_sid)
            .field("api_key_secret", &"[REDACTED]")
            .finish()
    }
}

/// Treat unset and empty values the same way
fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl Credentials {
    /// Read all secrets from process environment
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            account_sid: read("TWILIO_ACCOUNT_SID"),
            auth_token: read("TWILIO_AUTH_TOKEN"),
            api_key_sid: read("TWILIO_API_KEY_SID"),
            api_key_secret: read("TWILIO_API_KEY_SECRET"),
            conversations_service_sid: read("TWILIO_CONVERSATIONS_SERVICE_SID"),
        }
    }

    /// Credentials for REST calls
    pub fn rest(&self) -> Result<RestCredentials> {
        match (present(&self.account_sid), present(&self.auth_token)) {
            (Some(account_sid), Some(auth_token)) => Ok(RestCredentials {
                account_sid,
                auth_token,
            }),
            _ => Err(Error::Configuration(NOT_CONFIGURED.to_string())),
        }
    }

    /// Credentials for signing a video access token
    pub fn signing(&self) -> Result<SigningCredentials> {
        match (
            present(&self.account_sid),
            present(&self.api_key_sid),
            present(&self.api_key_secret),
        ) {
            (Some(account_sid), Some(api_key_sid), Some(api_key_secret)) => {
                Ok(SigningCredentials {
                    account_sid,
                    api_key_sid,
                    api_key_secret,
                })
            }
            _ => Err(Error::Configuration(NOT_FULLY_CONFIGURED.to_string())),
        }
    }

    /// Credentials for signing a chat access token, plus the conversation service sid
    pub fn chat_signing(&self) -> Result<(SigningCredentials, String)> {
        let service_sid = present(&self.conversations_service_sid)
            .ok_or_else(|| Error::Configuration(NOT_FULLY_CONFIGURED.to_string()))?;
        Ok((self.signing()?, service_sid))
    }
}
