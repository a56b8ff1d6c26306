use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Durable supervisor state, rewritten in full after every transition.
///
/// External consumers (the dashboard) read the serialized form without
/// coordination and must treat transient read failures as "no status
/// available". Invariant: `success_count + error_count <= total_runs`,
/// with equality whenever no run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulerState {
    pub last_run: Option<DateTime<Local>>,
    pub next_run: Option<DateTime<Local>>,
    pub total_runs: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub is_running: bool,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears a stale running flag left behind by a crashed process.
    /// Returns true when a reset actually happened so the caller can log
    /// a warning.
    pub fn reset_stale_running(&mut self) -> bool {
        let was_running = self.is_running;
        self.is_running = false;
        was_running
    }

    /// Marks the start of a run. Returns false, changing nothing, when a
    /// run is already in flight; the trigger must then be dropped.
    pub fn begin_run(&mut self, now: DateTime<Local>) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        self.last_run = Some(now);
        self.total_runs += 1;
        true
    }

    /// Marks run completion, successful or not, and clears the running
    /// flag. Must be called on every exit path of a run.
    pub fn finish_run(&mut self, success: bool) {
        if success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        self.is_running = false;
    }

    pub fn set_next_run(&mut self, at: DateTime<Local>) {
        self.next_run = Some(at);
    }
}
