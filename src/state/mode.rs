//! Timer modes, preset menus and profiles

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which countdown the timer is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
    Meditation,
}

impl Mode {
    /// Allowed durations in seconds, in menu order
    pub fn presets(self) -> &'static [u32] {
        match self {
            Mode::Work => &[900, 1500, 2700, 3600],
            Mode::Break => &[300, 600, 900],
            Mode::Meditation => &[300, 600, 900, 1200],
        }
    }

    /// Duration selected when the mode is entered explicitly
    pub fn default_duration(self) -> u32 {
        match self {
            Mode::Work => 1500,
            Mode::Break => 300,
            Mode::Meditation => 600,
        }
    }

    pub fn allows(self, seconds: u32) -> bool {
        self.presets().contains(&seconds)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
            Mode::Meditation => "meditation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of modes one timer screen works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimerProfile {
    /// Work/Break cycle with cycle counting
    Pomodoro,
    /// Single non-repeating countdown
    Meditation,
}

impl TimerProfile {
    pub fn initial_mode(self) -> Mode {
        match self {
            TimerProfile::Pomodoro => Mode::Work,
            TimerProfile::Meditation => Mode::Meditation,
        }
    }

    pub fn modes(self) -> &'static [Mode] {
        match self {
            TimerProfile::Pomodoro => &[Mode::Work, Mode::Break],
            TimerProfile::Meditation => &[Mode::Meditation],
        }
    }

    pub fn supports(self, mode: Mode) -> bool {
        self.modes().contains(&mode)
    }
}

/// Options that shape completion behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOptions {
    pub profile: TimerProfile,
    /// Start the following countdown right after an automatic mode switch
    pub auto_continue: bool,
    /// Emit a durable record when a meditation finishes
    pub record_meditation: bool,
}

impl TimerOptions {
    pub fn new(profile: TimerProfile) -> Self {
        Self {
            profile,
            auto_continue: false,
            record_meditation: false,
        }
    }
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self::new(TimerProfile::Pomodoro)
    }
}
