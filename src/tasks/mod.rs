//! Background tasks module
//!
//! This module contains the task that owns the session timer and its
//! countdown interval.

pub mod session_timer;

// Re-export main types
pub use session_timer::{CommandOutcome, TimerCommand, TimerError, TimerEvent, TimerHandle};
