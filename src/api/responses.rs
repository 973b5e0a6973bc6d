//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Mode, TimerProfile, TimerSnapshot};

/// Response for timer operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The operation changed the timer
    pub fn accepted(message: String, timer: TimerSnapshot) -> Self {
        Self::new("accepted".to_string(), message, timer)
    }

    /// The operation was not allowed in the current state; nothing changed
    pub fn rejected(message: String, timer: TimerSnapshot) -> Self {
        Self::new("rejected".to_string(), message, timer)
    }
}

/// Body of POST /timer/duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub seconds: u32,
}

/// Body of POST /timer/mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

/// Timer status with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub profile: TimerProfile,
    pub auto_continue: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModePresets {
    pub mode: Mode,
    pub presets: Vec<u32>,
    pub default_seconds: u32,
}

/// Duration menus for each mode of the active profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub profile: TimerProfile,
    pub modes: Vec<ModePresets>,
}

impl PresetsResponse {
    pub fn for_profile(profile: TimerProfile) -> Self {
        Self {
            profile,
            modes: profile
                .modes()
                .iter()
                .map(|&mode| ModePresets {
                    mode,
                    presets: mode.presets().to_vec(),
                    default_seconds: mode.default_duration(),
                })
                .collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
