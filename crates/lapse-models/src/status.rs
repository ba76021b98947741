//! Daemon status snapshots.

use serde::{Deserialize, Serialize};

use crate::day::DayKey;

/// Point-in-time view of the scheduler loop, published after every tick
/// and rendered by the `/status` command responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the capture loop is currently running
    pub running: bool,
    /// The day bucket currently receiving frames
    pub current_day: Option<DayKey>,
    /// Capture interval in seconds
    pub interval_secs: u64,
    /// Frames captured into the current bucket so far
    pub frames_today: u64,
}

impl StatusSnapshot {
    /// Snapshot for a loop that has not started yet.
    pub fn idle(interval_secs: u64) -> Self {
        Self {
            running: false,
            current_day: None,
            interval_secs,
            frames_today: 0,
        }
    }

    /// Human-readable status reply.
    pub fn render(&self) -> String {
        match (self.running, self.current_day) {
            (true, Some(day)) => format!(
                "Timelapse running.\nCurrent day: {}\nFrames today: {}\nNext capture every {}s.",
                day, self.frames_today, self.interval_secs
            ),
            _ => "Timelapse not running.".to_string(),
        }
    }
}
