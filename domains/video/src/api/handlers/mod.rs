//! HTTP handlers for the Video domain

pub mod rooms;
pub mod token;
