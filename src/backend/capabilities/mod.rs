//! Optional Collaborator Capabilities
//!
//! Collaborators that may be absent at runtime (summary service, activity
//! log). Absence is a modeled state: the service holds `Option<Arc<dyn ...>>`
//! and every call site checks the typed option, so "unavailable" is never an
//! exception path.

pub mod activity;
pub mod summary;

pub use activity::{ActivityEntry, ActivityLog, TracingActivityLog};
pub use summary::{HttpSummarizer, Summarizer, SummarizerError};
