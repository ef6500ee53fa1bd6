//! Confab: a standalone conversation/messaging service
//!
//! Conversations, membership, message lifecycle, read cursors, threads,
//! pins, and per-conversation real-time fan-out, behind a single service
//! layer and a thin HTTP surface.

pub mod backend;
pub mod shared;
