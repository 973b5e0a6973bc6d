//! External collaborators module
//!
//! This module contains the durable-record collaborator that stores
//! completed intervals in the hosted backend.

pub mod recorder;

// Re-export main types
pub use recorder::{LogRecorder, RecordError, RestRecorder, SessionRecord, SessionRecorder};
