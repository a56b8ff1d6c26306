//! Durable scheduler-state snapshots.
//!
//! The state file is the one shared resource between the scheduler and
//! external readers (the dashboard): read once at startup, fully
//! rewritten after every transition. Write failures are logged and
//! swallowed; the in-memory state stays authoritative for this process.

use std::fs;
use std::path::Path;

use harvest_core::SchedulerState;
use harvest_engine::AtomicFileWriter;
use harvest_logging::{harvest_error, harvest_info, harvest_warn};

pub(crate) fn load_state(path: &Path) -> SchedulerState {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return SchedulerState::new();
        }
        Err(err) => {
            harvest_warn!("failed to read scheduler state from {:?}: {}", path, err);
            return SchedulerState::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => {
            harvest_info!("loaded scheduler state from {:?}", path);
            state
        }
        Err(err) => {
            harvest_warn!("failed to parse scheduler state from {:?}: {}", path, err);
            SchedulerState::new()
        }
    }
}

pub(crate) fn save_state(path: &Path, state: &SchedulerState) {
    let content = match serde_json::to_vec_pretty(state) {
        Ok(bytes) => bytes,
        Err(err) => {
            harvest_error!("failed to serialize scheduler state: {}", err);
            return;
        }
    };

    let (Some(dir), Some(filename)) = (path.parent(), path.file_name()) else {
        harvest_error!("scheduler state path {:?} has no parent directory", path);
        return;
    };
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    if let Err(err) = writer.write(&filename.to_string_lossy(), &content) {
        harvest_error!("failed to write scheduler state to {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn missing_file_yields_default_state() {
        let temp = tempfile::TempDir::new().unwrap();
        let state = load_state(&temp.path().join("scheduler_status.json"));
        assert_eq!(state, SchedulerState::new());
    }

    #[test]
    fn corrupt_file_yields_default_state() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("scheduler_status.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_state(&path), SchedulerState::new());
    }

    #[test]
    fn state_survives_a_save_load_cycle() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("scheduler_status.json");

        let mut state = SchedulerState::new();
        state.begin_run(Local::now());
        state.finish_run(true);
        save_state(&path, &state);

        assert_eq!(load_state(&path), state);
    }
}
