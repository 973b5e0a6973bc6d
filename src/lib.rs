//! Zene - session timer service for Pomodoro focus and meditation
//!
//! This library provides the countdown state machine shared by the focus and
//! meditation screens, the task that drives it once per second, and the
//! collaborator that stores completed intervals in the hosted backend.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Mode, SessionTimer, TimerOptions, TimerProfile};
pub use api::create_router;
pub use tasks::TimerHandle;
pub use utils::signals::shutdown_signal;
