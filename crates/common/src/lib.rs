//! Shared configuration, credential resolution, and error handling for Commlink
//!
//! This crate provides common functionality used across the Commlink service:
//! - Configuration management following 12-factor principles
//! - Per-request resolution of provider credentials
//! - Error types and handling
//! - Request body extractors

pub mod config;
pub mod credentials;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use credentials::{Credentials, RestCredentials, SigningCredentials};
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
