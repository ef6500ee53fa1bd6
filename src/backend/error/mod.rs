//! Backend error handling

pub mod conversion;
pub mod types;

pub use types::ApiError;
