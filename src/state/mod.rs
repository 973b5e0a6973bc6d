//! State management module
//!
//! This module contains the session timer state machine, its presets and
//! the shared application state served over HTTP.

pub mod app_state;
pub mod mode;
pub mod session_timer;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use mode::{Mode, TimerOptions, TimerProfile};
pub use session_timer::{Completion, Phase, RecordKind, SessionTimer};
pub use timer_state::TimerSnapshot;
