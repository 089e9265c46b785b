use crate::{RunId, TaskEvent, TaskFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Cancelling,
    Completed,
    Failed,
}

/// Caller-side view of one worker slot.
///
/// Only events of the current run are applied; anything still queued from an
/// earlier run is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    run_id: Option<RunId>,
    status: RunStatus,
    items_emitted: usize,
    progress_percent: u8,
    last_status: Option<String>,
    failure: Option<TaskFailure>,
    cancelled: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new run. Counters go back to zero before any event of the
    /// new run is applied.
    pub fn begin(&mut self, run_id: RunId) {
        *self = Self {
            run_id: Some(run_id),
            status: RunStatus::Running,
            ..Self::default()
        };
    }

    /// Running → Cancelling. Any other status is left alone.
    pub fn request_cancel(&mut self) {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Cancelling;
        }
    }

    pub fn apply(&mut self, event: &TaskEvent) {
        if self.run_id != Some(event.run_id()) || self.is_finished() {
            return;
        }
        match event {
            TaskEvent::Discovered { .. } => {
                self.items_emitted += 1;
            }
            TaskEvent::Progress { percent, .. } => {
                self.progress_percent = self.progress_percent.max((*percent).min(100));
            }
            TaskEvent::Status { message, .. } => {
                self.last_status = Some(message.clone());
            }
            TaskEvent::Completed {
                items_emitted,
                cancelled,
                ..
            } => {
                self.items_emitted = *items_emitted;
                self.cancelled = *cancelled;
                self.status = RunStatus::Completed;
            }
            TaskEvent::Failed { reason, .. } => {
                self.failure = Some(reason.clone());
                self.status = RunStatus::Failed;
            }
        }
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.run_id
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn items_emitted(&self) -> usize {
        self.items_emitted
    }

    pub fn progress(&self) -> u8 {
        self.progress_percent
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        self.failure.as_ref()
    }

    /// True when the run ended in `Completed` because the caller cancelled it.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, RunStatus::Running | RunStatus::Cancelling)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, RunStatus::Completed | RunStatus::Failed)
    }
}

/// Fold one event into the state.
pub fn update(mut state: RunState, event: &TaskEvent) -> RunState {
    state.apply(event);
    state
}
