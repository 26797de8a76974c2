//! Per-session jump statistics

use serde::{Deserialize, Serialize};

/// Accumulators for one session. Timestamps are wall-clock milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub perfect_jumps: u32,
    pub total_jumps: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    session_start: Option<f64>,
    /// Whole seconds since `session_start`
    pub duration_secs: u64,
}

/// Read-only view handed to the display collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub duration_secs: u64,
    pub perfect_jumps: u32,
    pub total_jumps: u32,
    pub longest_streak: u32,
    pub success_rate: u32,
}

impl StatsSnapshot {
    /// Duration as `m:ss`
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_secs)
    }
}

impl SessionStats {
    /// Zero every counter and start the clock at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self {
            session_start: Some(now_ms),
            ..Default::default()
        };
    }

    pub fn update_session_time(&mut self, now_ms: f64) {
        if let Some(start) = self.session_start {
            self.duration_secs = ((now_ms - start) / 1000.0).floor().max(0.0) as u64;
        }
    }

    /// A character left the ground. Counted now, judged later.
    pub fn record_jump_start(&mut self) {
        self.total_jumps += 1;
    }

    /// Verdict on a jump already counted by `record_jump_start`
    pub fn judge_jump(&mut self, perfect: bool) {
        if perfect {
            self.perfect_jumps += 1;
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Rounded percentage of perfect jumps, 0 with no jumps
    pub fn success_rate(&self) -> u32 {
        if self.total_jumps == 0 {
            return 0;
        }
        (self.perfect_jumps as f64 / self.total_jumps as f64 * 100.0).round() as u32
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            duration_secs: self.duration_secs,
            perfect_jumps: self.perfect_jumps,
            total_jumps: self.total_jumps,
            longest_streak: self.longest_streak,
            success_rate: self.success_rate(),
        }
    }
}

pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
