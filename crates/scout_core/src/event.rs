use serde::Serialize;

use crate::DiscoveredItem;

pub type RunId = u64;

/// Everything a worker run tells its caller, in emission order.
///
/// Each run produces any number of `Discovered`, `Progress` and `Status`
/// events followed by exactly one `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TaskEvent {
    Discovered {
        run_id: RunId,
        item: DiscoveredItem,
    },
    Progress {
        run_id: RunId,
        percent: u8,
    },
    Status {
        run_id: RunId,
        message: String,
    },
    /// Normal end, cap reached, or cancelled by the caller.
    Completed {
        run_id: RunId,
        items_emitted: usize,
        cancelled: bool,
    },
    Failed {
        run_id: RunId,
        reason: TaskFailure,
    },
}

impl TaskEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            TaskEvent::Discovered { run_id, .. }
            | TaskEvent::Progress { run_id, .. }
            | TaskEvent::Status { run_id, .. }
            | TaskEvent::Completed { run_id, .. }
            | TaskEvent::Failed { run_id, .. } => *run_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskEvent::Completed { .. } | TaskEvent::Failed { .. }
        )
    }
}

/// Why a run ended in `Failed`. Filesystem errors never get here; they are
/// recovered inside the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskFailure {
    #[error("invalid url: {message}")]
    InvalidUrl { message: String },
    #[error("http request failed with status {code}")]
    HttpStatus { code: u16 },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("worker error: {message}")]
    Internal { message: String },
}
