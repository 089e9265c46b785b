use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};
use scout_core::{RunId, RunState, TaskEvent, TaskFailure};
use tokio_util::sync::CancellationToken;

use crate::task::{TaskBody, TaskContext};

const RECV_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("worker `{0}` already has an active run")]
    AlreadyRunning(String),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
    thread: thread::JoinHandle<()>,
}

/// One logical worker: at most one run at a time, each on its own thread.
///
/// Events from every run arrive on the same channel. Draining them through
/// [`WorkerSlot::try_recv`] or [`WorkerSlot::recv`] keeps [`WorkerSlot::state`]
/// current.
pub struct WorkerSlot {
    label: String,
    event_tx: mpsc::Sender<TaskEvent>,
    event_rx: mpsc::Receiver<TaskEvent>,
    active: Option<ActiveRun>,
    state: RunState,
    last_run_id: RunId,
}

impl WorkerSlot {
    pub fn new(label: impl Into<String>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            label: label.into(),
            event_tx,
            event_rx,
            active: None,
            state: RunState::new(),
            last_run_id: 0,
        }
    }

    /// Start a run. Rejected while the previous run's thread is still alive.
    pub fn start<B: TaskBody>(&mut self, body: B) -> Result<RunId, StartError> {
        if self.is_running() {
            return Err(StartError::AlreadyRunning(self.label.clone()));
        }
        self.reap();

        let run_id = self.last_run_id + 1;
        let cancel = CancellationToken::new();
        let ctx = TaskContext::new(run_id, self.event_tx.clone(), cancel.clone());
        let thread = thread::Builder::new()
            .name(format!("scout-{}-{}", self.label, run_id))
            .spawn(move || run_body(body, ctx))?;

        self.last_run_id = run_id;
        self.state.begin(run_id);
        self.active = Some(ActiveRun {
            run_id,
            cancel,
            thread,
        });
        Ok(run_id)
    }

    /// Cancel any active run, wait for it to finish, then start `body`.
    pub fn restart<B: TaskBody>(&mut self, body: B) -> Result<RunId, StartError> {
        self.cancel();
        self.wait();
        self.start(body)
    }

    /// Request cooperative cancellation of the active run.
    pub fn cancel(&mut self) {
        if let Some(active) = &self.active {
            engine_info!("Cancelling {} run {}", self.label, active.run_id);
            active.cancel.cancel();
            self.state.request_cancel();
        }
    }

    /// Token of the active run, for cancelling from another thread.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|active| active.cancel.clone())
    }

    /// Block until the active run's thread has exited. Its terminal event is
    /// queued by then.
    pub fn wait(&mut self) {
        self.reap();
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.thread.is_finished())
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn try_recv(&mut self) -> Option<TaskEvent> {
        let event = self.event_rx.try_recv().ok()?;
        self.state.apply(&event);
        Some(event)
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<TaskEvent> {
        let event = self.event_rx.recv_timeout(timeout).ok()?;
        self.state.apply(&event);
        Some(event)
    }

    /// Block for the next event. Returns `None` once no run is alive and the
    /// queue is empty.
    pub fn recv(&mut self) -> Option<TaskEvent> {
        loop {
            if let Some(event) = self.recv_timeout(RECV_POLL) {
                return Some(event);
            }
            if !self.is_running() {
                return self.try_recv();
            }
        }
    }

    fn reap(&mut self) {
        if let Some(active) = self.active.take() {
            if active.thread.join().is_err() {
                engine_error!("{} run {} thread panicked", self.label, active.run_id);
            }
        }
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}

fn run_body<B: TaskBody>(mut body: B, mut ctx: TaskContext) {
    let label = body.label().to_string();
    engine_info!("{} run {} started", label, ctx.run_id());
    let result = panic::catch_unwind(AssertUnwindSafe(|| body.run(&mut ctx)))
        .unwrap_or_else(|_| {
            Err(TaskFailure::Internal {
                message: format!("{label} worker panicked"),
            })
        });
    match &result {
        Ok(()) => engine_info!("{} run {} finished", label, ctx.run_id()),
        Err(reason) => engine_info!("{} run {} failed: {}", label, ctx.run_id(), reason),
    }
    ctx.finish(result);
}
