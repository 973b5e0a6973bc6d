//! Read-only view of the session timer published to clients

use serde::{Deserialize, Serialize};

use super::{Mode, Phase, SessionTimer};

/// Point-in-time copy of the timer state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub configured_seconds: u32,
    pub remaining_seconds: u32,
    pub running: bool,
    pub completed: bool,
    pub cycles_completed: u32,
    pub elapsed_seconds: u32,
    /// Remaining time as MM:SS
    pub display: String,
    /// Fraction of the interval already elapsed (0.0 - 1.0)
    pub progress: f64,
}

impl TimerSnapshot {
    pub fn from_timer(timer: &SessionTimer) -> Self {
        let configured = timer.configured_duration();
        let remaining = timer.remaining();
        Self {
            mode: timer.mode(),
            phase: timer.phase(),
            configured_seconds: configured,
            remaining_seconds: remaining,
            running: timer.is_running(),
            completed: timer.is_completed(),
            cycles_completed: timer.cycles_completed(),
            elapsed_seconds: configured.saturating_sub(remaining),
            display: format_mmss(remaining),
            progress: progress(configured, remaining),
        }
    }
}

/// Format seconds as MM:SS (minutes are not wrapped into hours)
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn progress(configured: u32, remaining: u32) -> f64 {
    if configured == 0 {
        return 1.0;
    }
    1.0 - f64::from(remaining) / f64::from(configured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TimerOptions, TimerProfile};

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(1500), "25:00");
        assert_eq!(format_mmss(90), "01:30");
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(3600), "60:00");
    }

    #[test]
    fn test_snapshot_tracks_timer() {
        let mut timer = SessionTimer::new(TimerOptions::new(TimerProfile::Meditation));
        timer.set_duration(300);
        timer.start();
        for _ in 0..150 {
            timer.tick();
        }

        let snapshot = timer.snapshot();
        assert_eq!(snapshot.mode, Mode::Meditation);
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.remaining_seconds, 150);
        assert_eq!(snapshot.elapsed_seconds, 150);
        assert_eq!(snapshot.display, "02:30");
        assert!((snapshot.progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_json_carries_elapsed() {
        let mut timer = SessionTimer::new(TimerOptions::new(TimerProfile::Meditation));
        timer.set_duration(300);
        timer.start();
        for _ in 0..10 {
            timer.tick();
        }

        let json = serde_json::to_value(timer.snapshot()).unwrap();
        assert_eq!(json["elapsed_seconds"], 10);
        assert_eq!(json["remaining_seconds"], 290);
    }
}
