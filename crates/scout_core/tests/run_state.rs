use std::sync::Once;

use pretty_assertions::assert_eq;
use scout_core::{update, DiscoveredItem, ItemKind, RunState, RunStatus, TaskEvent, TaskFailure};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn found(run_id: u64, name: &str) -> TaskEvent {
    TaskEvent::Discovered {
        run_id,
        item: DiscoveredItem::new(name, format!("/data/{name}"), ItemKind::Image),
    }
}

fn progress(run_id: u64, percent: u8) -> TaskEvent {
    TaskEvent::Progress { run_id, percent }
}

#[test]
fn new_state_is_idle() {
    init_logging();
    let state = RunState::new();
    assert_eq!(state.status(), RunStatus::Idle);
    assert_eq!(state.items_emitted(), 0);
    assert_eq!(state.progress(), 0);
    assert!(!state.is_active());
}

#[test]
fn running_run_counts_items_and_completes() {
    init_logging();
    let mut state = RunState::new();
    state.begin(1);
    assert_eq!(state.status(), RunStatus::Running);

    let state = update(state, &found(1, "a.png"));
    let state = update(state, &found(1, "b.png"));
    let state = update(state, &progress(1, 40));
    let state = update(
        state,
        &TaskEvent::Status {
            run_id: 1,
            message: "Scanning /data".into(),
        },
    );
    assert_eq!(state.items_emitted(), 2);
    assert_eq!(state.progress(), 40);
    assert_eq!(state.last_status(), Some("Scanning /data"));

    let state = update(
        state,
        &TaskEvent::Completed {
            run_id: 1,
            items_emitted: 2,
            cancelled: false,
        },
    );
    assert_eq!(state.status(), RunStatus::Completed);
    assert!(state.is_finished());
    assert!(!state.was_cancelled());
}

#[test]
fn progress_never_moves_backwards() {
    init_logging();
    let mut state = RunState::new();
    state.begin(3);
    let state = update(state, &progress(3, 60));
    let state = update(state, &progress(3, 20));
    assert_eq!(state.progress(), 60);
    let state = update(state, &progress(3, 250));
    assert_eq!(state.progress(), 100);
}

#[test]
fn cancel_path_ends_completed_not_failed() {
    init_logging();
    let mut state = RunState::new();
    state.begin(4);
    state = update(state, &found(4, "a.png"));
    state.request_cancel();
    assert_eq!(state.status(), RunStatus::Cancelling);
    assert!(state.is_active());

    let state = update(
        state,
        &TaskEvent::Completed {
            run_id: 4,
            items_emitted: 1,
            cancelled: true,
        },
    );
    assert_eq!(state.status(), RunStatus::Completed);
    assert!(state.was_cancelled());
    assert_eq!(state.items_emitted(), 1);
}

#[test]
fn request_cancel_is_ignored_when_not_running() {
    init_logging();
    let mut state = RunState::new();
    state.request_cancel();
    assert_eq!(state.status(), RunStatus::Idle);
}

#[test]
fn restart_resets_counters_and_drops_stale_events() {
    init_logging();
    let mut state = RunState::new();
    state.begin(1);
    state = update(state, &found(1, "a.png"));
    state = update(state, &progress(1, 80));
    state = update(
        state,
        &TaskEvent::Completed {
            run_id: 1,
            items_emitted: 1,
            cancelled: false,
        },
    );

    state.begin(2);
    assert_eq!(state.items_emitted(), 0);
    assert_eq!(state.progress(), 0);
    assert_eq!(state.run_id(), Some(2));

    // Late events from run 1 do not leak into run 2.
    state = update(state, &found(1, "late.png"));
    state = update(state, &progress(1, 100));
    assert_eq!(state.items_emitted(), 0);
    assert_eq!(state.progress(), 0);

    state = update(state, &found(2, "fresh.png"));
    assert_eq!(state.items_emitted(), 1);
}

#[test]
fn failure_is_recorded_and_final() {
    init_logging();
    let mut state = RunState::new();
    state.begin(9);
    state = update(
        state,
        &TaskEvent::Failed {
            run_id: 9,
            reason: TaskFailure::HttpStatus { code: 503 },
        },
    );
    assert_eq!(state.status(), RunStatus::Failed);
    assert_eq!(state.failure(), Some(&TaskFailure::HttpStatus { code: 503 }));

    // Nothing after the terminal event changes the outcome.
    state = update(state, &found(9, "x.png"));
    assert_eq!(state.items_emitted(), 0);
    assert_eq!(state.status(), RunStatus::Failed);
}
