//! Supervised periodic execution of the harvest pipeline.
//!
//! The mutual-exclusion invariant rests solely on the in-process
//! `is_running` flag, checked synchronously before a run starts. That is
//! a single-instance deployment assumption: two scheduler processes
//! sharing one state file could race.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use tokio::time::MissedTickBehavior;

use harvest_core::{next_run_after, SchedulerState, TriggerTimes};
use harvest_logging::{harvest_error, harvest_info, harvest_warn};

use crate::runner::SessionRunner;
use crate::state_store;

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub triggers: TriggerTimes,
    /// Cadence at which pending triggers are polled.
    pub poll_interval: Duration,
    /// Wall-clock budget for one harvest run.
    pub run_timeout: Duration,
    pub state_path: PathBuf,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            triggers: TriggerTimes::default(),
            poll_interval: Duration::from_secs(60),
            run_timeout: Duration::from_secs(5 * 60),
            state_path: PathBuf::from("logs/scheduler_status.json"),
        }
    }
}

/// Owns the durable [`SchedulerState`] and fires harvest runs on the
/// configured daily triggers.
pub struct RunScheduler<R> {
    settings: SchedulerSettings,
    state: SchedulerState,
    runner: R,
}

impl<R: SessionRunner> RunScheduler<R> {
    /// Loads persisted state (defaults when absent). A stale running flag
    /// from a crashed process is reset with a warning.
    pub fn new(settings: SchedulerSettings, runner: R) -> Self {
        let mut state = state_store::load_state(&settings.state_path);
        if state.reset_stale_running() {
            harvest_warn!(
                "scheduler state in {:?} claimed a run in progress; resetting after restart",
                settings.state_path
            );
        }
        Self {
            settings,
            state,
            runner,
        }
    }

    /// Runs the supervision loop until a shutdown signal arrives.
    pub async fn run(&mut self) {
        self.recompute_next_run(Local::now());
        harvest_info!(
            "scheduler started; triggers {:?}, next run {:?}",
            self.settings.triggers.times(),
            self.state.next_run
        );

        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Local::now();
                    if self.state.next_run.is_some_and(|at| now >= at) {
                        self.trigger(now).await;
                        self.recompute_next_run(Local::now());
                    } else if now.minute() == 0 {
                        // Hourly refresh keeps next_run accurate across
                        // day rollovers.
                        self.recompute_next_run(now);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    harvest_info!("shutdown signal received; stopping scheduler");
                    break;
                }
            }
        }
        self.persist();
    }

    /// Fires one harvest run unless another is already in flight, in
    /// which case the trigger is dropped with a warning, not queued.
    pub async fn trigger(&mut self, now: DateTime<Local>) {
        if !self.state.begin_run(now) {
            harvest_warn!("harvest already running; dropping trigger");
            return;
        }
        self.persist();
        harvest_info!("harvest run {} starting", self.state.total_runs);

        let outcome = tokio::time::timeout(self.settings.run_timeout, self.runner.run()).await;
        let success = match outcome {
            Ok(Ok(())) => {
                harvest_info!("harvest run completed");
                true
            }
            Ok(Err(err)) => {
                harvest_error!("harvest run failed: {err:#}");
                false
            }
            Err(_) => {
                harvest_error!(
                    "harvest run exceeded {:?} and was aborted",
                    self.settings.run_timeout
                );
                false
            }
        };

        // The running flag is cleared and persisted on every exit path,
        // timeout and failure included.
        self.state.finish_run(success);
        self.persist();
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    fn recompute_next_run(&mut self, now: DateTime<Local>) {
        let at = next_run_after(now, &self.settings.triggers);
        if self.state.next_run != Some(at) {
            self.state.set_next_run(at);
            self.persist();
        }
    }

    fn persist(&self) {
        state_store::save_state(&self.settings.state_path, &self.state);
    }
}
