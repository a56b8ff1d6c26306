use chrono::Local;
use harvest_core::SchedulerState;

fn init_logging() {
    harvest_logging::initialize_for_tests();
}

#[test]
fn begin_run_is_refused_while_running() {
    init_logging();
    let mut state = SchedulerState::new();
    assert!(state.begin_run(Local::now()));
    assert_eq!(state.total_runs, 1);
    assert!(state.is_running);

    // A second trigger while running is dropped and counts nothing.
    assert!(!state.begin_run(Local::now()));
    assert_eq!(state.total_runs, 1);
}

#[test]
fn finish_run_updates_counters_and_clears_flag() {
    let mut state = SchedulerState::new();
    state.begin_run(Local::now());
    state.finish_run(true);
    assert!(!state.is_running);
    assert_eq!(state.success_count, 1);
    assert_eq!(state.error_count, 0);

    state.begin_run(Local::now());
    state.finish_run(false);
    assert_eq!(state.success_count, 1);
    assert_eq!(state.error_count, 1);
    assert_eq!(state.total_runs, 2);
    // Counters reconcile once no run is in flight.
    assert_eq!(state.success_count + state.error_count, state.total_runs);
}

#[test]
fn stale_running_flag_is_reset_on_load() {
    let mut state = SchedulerState {
        is_running: true,
        ..SchedulerState::new()
    };
    assert!(state.reset_stale_running());
    assert!(!state.is_running);
    // Idempotent.
    assert!(!state.reset_stale_running());
}

#[test]
fn state_round_trips_through_json() {
    let mut state = SchedulerState::new();
    state.begin_run(Local::now());
    state.finish_run(true);
    state.set_next_run(Local::now());

    let text = serde_json::to_string_pretty(&state).unwrap();
    let restored: SchedulerState = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, state);
}
