//! Commlink application composition root
//!
//! Composes the chat and video domain routers into a single application
//! and owns the shared HTTP layers.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Json, Router,
};
use commlink_chat::ChatState;
use commlink_common::{Config, Credentials};
use commlink_twilio::{TwilioConfig, TwilioConnector, TwilioConnectorFactory};
use commlink_video::VideoState;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router from loaded configuration
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let connector = TwilioConnectorFactory::create(TwilioConfig::from(config))?;

    tracing::info!(provider = %config.provider, "Twilio connector ready");

    create_router(
        config.credentials.clone(),
        connector,
        &config.cors_allowed_origin,
    )
}

/// Build the router around an already-chosen connector
pub fn create_router(
    credentials: Credentials,
    connector: Arc<dyn TwilioConnector>,
    cors_origin: &str,
) -> Result<Router, anyhow::Error> {
    let chat_state = ChatState {
        credentials: credentials.clone(),
        twilio: connector.clone(),
    };
    let video_state = VideoState {
        credentials,
        twilio: connector,
    };

    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api/chat", commlink_chat::routes().with_state(chat_state))
        .nest("/api/video", commlink_video::routes().with_state(video_state))
        .layer(build_cors_layer(cors_origin)?)
        .layer(body_limit_layer());

    Ok(app)
}

/// CORS for the single configured browser origin, with credentials
pub fn build_cors_layer(origin: &str) -> Result<CorsLayer, anyhow::Error> {
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin {origin:?}: {e}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "up" }))
}
