//! Countdown state machine shared by the focus and meditation timers
//!
//! The machine is synchronous and does no I/O. The background task in
//! [`crate::tasks::session_timer`] calls [`SessionTimer::tick`] once per
//! second while the timer runs and performs the side effects described by
//! the returned [`Completion`].

use serde::{Deserialize, Serialize};

use super::{Mode, TimerOptions, TimerProfile, TimerSnapshot};

/// Coarse state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// Kind of interval stored by the durable-record collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Work,
    Meditation,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Work => "work",
            RecordKind::Meditation => "meditation",
        }
    }
}

/// What happened when a countdown reached zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Mode whose countdown finished
    pub mode: Mode,
    pub duration_seconds: u32,
    /// Record to emit, if this completion is durably stored
    pub record: Option<RecordKind>,
}

impl Completion {
    pub fn is_break_over(&self) -> bool {
        self.mode == Mode::Break
    }
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    options: TimerOptions,
    mode: Mode,
    work_duration: u32,
    break_duration: u32,
    meditation_duration: u32,
    remaining: u32,
    running: bool,
    completed: bool,
    cycles_completed: u32,
}

impl SessionTimer {
    /// Create an idle timer in the profile's initial mode with default durations
    pub fn new(options: TimerOptions) -> Self {
        let mode = options.profile.initial_mode();
        let mut timer = Self {
            options,
            mode,
            work_duration: Mode::Work.default_duration(),
            break_duration: Mode::Break.default_duration(),
            meditation_duration: Mode::Meditation.default_duration(),
            remaining: 0,
            running: false,
            completed: false,
            cycles_completed: 0,
        };
        timer.remaining = timer.configured_duration();
        timer
    }

    pub fn options(&self) -> TimerOptions {
        self.options
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn configured_duration(&self) -> u32 {
        self.duration_for(self.mode)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn phase(&self) -> Phase {
        if self.running {
            Phase::Running
        } else if self.completed {
            Phase::Completed
        } else {
            Phase::Idle
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from_timer(self)
    }

    /// Start or resume the countdown.
    ///
    /// Returns false when already running or nothing is left to count.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining == 0 {
            return false;
        }
        self.running = true;
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stop and rewind the current interval. Cycle count is kept.
    pub fn reset(&mut self) -> bool {
        self.running = false;
        self.remaining = self.configured_duration();
        self.completed = false;
        true
    }

    /// Rewind the whole Pomodoro session back to the first work interval.
    pub fn reset_all(&mut self) -> bool {
        if self.options.profile != TimerProfile::Pomodoro {
            return false;
        }
        self.mode = Mode::Work;
        self.work_duration = Mode::Work.default_duration();
        self.break_duration = Mode::Break.default_duration();
        self.cycles_completed = 0;
        self.reset()
    }

    /// Select a preset for the current mode. Rejected while running.
    pub fn set_duration(&mut self, seconds: u32) -> bool {
        if self.running || !self.mode.allows(seconds) {
            return false;
        }
        *self.duration_slot(self.mode) = seconds;
        self.remaining = seconds;
        self.completed = false;
        true
    }

    /// Switch mode, selecting that mode's default preset. Rejected while running.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.running || !self.options.profile.supports(mode) {
            return false;
        }
        self.mode = mode;
        *self.duration_slot(mode) = mode.default_duration();
        self.remaining = mode.default_duration();
        self.completed = false;
        true
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion when this tick took `remaining` to zero. A tick
    /// on a timer that is not running changes nothing.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running || self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }

        self.running = false;
        self.completed = true;
        let finished = self.mode;
        let duration_seconds = self.configured_duration();

        let record = match finished {
            Mode::Meditation => self.options.record_meditation.then_some(RecordKind::Meditation),
            Mode::Work => {
                self.cycles_completed += 1;
                self.enter(Mode::Break);
                Some(RecordKind::Work)
            }
            Mode::Break => {
                self.enter(Mode::Work);
                None
            }
        };

        Some(Completion {
            mode: finished,
            duration_seconds,
            record,
        })
    }

    /// Automatic transition after a Work or Break interval finishes.
    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining = self.configured_duration();
        self.completed = false;
        self.running = self.options.auto_continue;
    }

    fn duration_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_duration,
            Mode::Break => self.break_duration,
            Mode::Meditation => self.meditation_duration,
        }
    }

    fn duration_slot(&mut self, mode: Mode) -> &mut u32 {
        match mode {
            Mode::Work => &mut self.work_duration,
            Mode::Break => &mut self.break_duration,
            Mode::Meditation => &mut self.meditation_duration,
        }
    }
}
