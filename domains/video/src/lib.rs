//! Video domain: rooms, room participants, video access tokens

pub mod api;

// Re-export API types
pub use api::routes;
pub use api::VideoState;
