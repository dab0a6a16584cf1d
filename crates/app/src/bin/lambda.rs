//! Commlink API - AWS Lambda Runtime

use lambda_http::{run, Error};
use tower_http::trace::TraceLayer;
use tracing::info;

use commlink_app::create_app;
use commlink_common::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Commlink API Lambda");

    let config =
        Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let app = create_app(&config)
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let app = app.layer(TraceLayer::new_for_http());

    info!("Commlink API Lambda ready to serve requests");

    run(app).await
}
