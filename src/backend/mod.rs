//! Backend: stores, service, real-time fan-out, and the HTTP surface

pub mod capabilities;
pub mod conversations;
pub mod error;
pub mod identity;
pub mod messages;
pub mod pins;
pub mod read_state;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod service;
pub mod threads;
