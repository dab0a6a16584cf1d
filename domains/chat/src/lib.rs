//! Chat domain: conversations, participants, messages, chat access tokens

pub mod api;

// Re-export API types
pub use api::routes;
pub use api::ChatState;
