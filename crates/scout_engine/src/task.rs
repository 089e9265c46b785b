use std::sync::mpsc;

use scout_core::{DiscoveredItem, RunId, TaskEvent, TaskFailure};
use tokio_util::sync::CancellationToken;

/// Where workers put what they find.
///
/// [`TaskContext`] forwards into the run's event channel; tests can collect
/// into a plain vector instead.
pub trait ItemSink {
    fn is_cancelled(&self) -> bool;
    /// Returns `false` and drops the item once cancellation has been observed.
    fn emit(&mut self, item: DiscoveredItem) -> bool;
    fn status(&mut self, message: String);
    /// Values lower than an earlier report are ignored.
    fn progress(&mut self, percent: u8);
    fn items_emitted(&self) -> usize;
}

/// The body of a background run. Implementations poll
/// [`ItemSink::is_cancelled`] at every loop iteration and before every
/// network call.
pub trait TaskBody: Send + 'static {
    fn label(&self) -> &str;
    fn run(&mut self, ctx: &mut TaskContext) -> Result<(), TaskFailure>;
}

/// Per-run handle given to a [`TaskBody`]. Owns the run's counters; nothing
/// else writes to them.
pub struct TaskContext {
    run_id: RunId,
    events: mpsc::Sender<TaskEvent>,
    cancel: CancellationToken,
    items_emitted: usize,
    progress: u8,
}

impl TaskContext {
    pub fn new(run_id: RunId, events: mpsc::Sender<TaskEvent>, cancel: CancellationToken) -> Self {
        Self {
            run_id,
            events,
            cancel,
            items_emitted: 0,
            progress: 0,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Send the single terminal event for this run.
    ///
    /// A cancelled run always ends `Completed`, whatever the body returned.
    pub fn finish(self, result: Result<(), TaskFailure>) {
        let cancelled = self.cancel.is_cancelled();
        let event = match result {
            Err(reason) if !cancelled => TaskEvent::Failed {
                run_id: self.run_id,
                reason,
            },
            _ => TaskEvent::Completed {
                run_id: self.run_id,
                items_emitted: self.items_emitted,
                cancelled,
            },
        };
        self.send(event);
    }

    fn send(&self, event: TaskEvent) {
        // The caller may have dropped the receiver; the run still finishes.
        let _ = self.events.send(event);
    }
}

impl ItemSink for TaskContext {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn emit(&mut self, item: DiscoveredItem) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.items_emitted += 1;
        self.send(TaskEvent::Discovered {
            run_id: self.run_id,
            item,
        });
        true
    }

    fn status(&mut self, message: String) {
        self.send(TaskEvent::Status {
            run_id: self.run_id,
            message,
        });
    }

    fn progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent <= self.progress {
            return;
        }
        self.progress = percent;
        self.send(TaskEvent::Progress {
            run_id: self.run_id,
            percent,
        });
    }

    fn items_emitted(&self) -> usize {
        self.items_emitted
    }
}
