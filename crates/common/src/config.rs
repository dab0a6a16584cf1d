//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

use crate::credentials::Credentials;

pub const DEFAULT_CONVERSATIONS_BASE_URL: &str = "https://conversations.twilio.com";
pub const DEFAULT_VIDEO_BASE_URL: &str = "https://video.twilio.com";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_PORT: u16 = 6969;

#[derive(Debug, Clone)]
pub struct Config {
    /// Provider secrets, resolved per request
    pub credentials: Credentials,

    /// Remote provider (twilio, mock)
    pub provider: String,
    pub conversations_base_url: String,
    pub video_base_url: String,

    /// Single browser origin allowed by CORS
    pub cors_allowed_origin: String,

    /// Local server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let config = Self {
            credentials: Credentials::from_env(),

            provider: env::var("TWILIO_PROVIDER").unwrap_or_else(|_| "twilio".to_string()),
            conversations_base_url: env::var("TWILIO_CONVERSATIONS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CONVERSATIONS_BASE_URL.to_string()),
            video_base_url: env::var("TWILIO_VIDEO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_VIDEO_BASE_URL.to_string()),

            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),

            port,
        };

        Ok(config)
    }
}
