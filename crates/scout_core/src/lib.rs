//! Scout core: discovery data model, run-state machine and progress helpers.
//!
//! Nothing in here performs IO. The engine crate produces [`TaskEvent`]s and
//! front ends fold them into a [`RunState`] with [`update`].
mod classify;
mod event;
mod item;
mod progress;
mod state;

pub use classify::{
    ExtensionTable, MediaFilter, DOCUMENT_KINDS, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use event::{RunId, TaskEvent, TaskFailure};
pub use item::{DiscoveredItem, ItemKind};
pub use progress::{banded_percent, percent_of, percent_of_cap, status};
pub use state::{update, RunState, RunStatus};
