//! Real-time fan-out: per-conversation broadcast channels and the SSE
//! subscription endpoint.

pub mod broadcast;
pub mod subscription;

pub use broadcast::ConversationFanout;
