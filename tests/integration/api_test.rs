//! HTTP-level tests for the Commlink API against the in-memory provider

mod chat;
mod common;
mod configuration;
mod provider_paths;
mod video;
