//! Shared application state served by the HTTP API

use std::{
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::tasks::TimerHandle;

/// State shared by all request handlers
pub struct AppState {
    /// Handle to the session timer task
    pub timer: TimerHandle,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last accepted operation
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, timer: TimerHandle) -> Self {
        Self {
            timer,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Remember the most recent accepted operation
    pub fn track_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to lock last action: {}", e),
        }
        match self.last_action_time.lock() {
            Ok(mut last_time) => *last_time = Some(Utc::now()),
            Err(e) => warn!("Failed to lock last action time: {}", e),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{services::LogRecorder, state::TimerOptions};

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }

    #[tokio::test]
    async fn test_track_action() {
        let timer = TimerHandle::spawn(TimerOptions::default(), Arc::new(LogRecorder));
        let state = AppState::new(20554, "127.0.0.1".to_string(), timer);
        assert_eq!(state.get_last_action(), (None, None));

        state.track_action("start");
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}
