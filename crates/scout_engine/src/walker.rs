//! Depth- and count-bounded directory traversal.
//!
//! The walk is depth first (`walkdir`), so memory stays proportional to the
//! deepest path rather than the widest directory. Unreadable directories are
//! skipped; everything else about the run carries on.

use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info, engine_warn};
use scout_core::{percent_of, percent_of_cap, status, DiscoveredItem, ItemKind, TaskFailure};
use walkdir::WalkDir;

use crate::config::{ScanConfig, ScanMode};
use crate::task::{ItemSink, TaskBody, TaskContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub found: usize,
    pub roots_completed: usize,
    /// Stopped because `max_items` was reached.
    pub capped: bool,
    pub cancelled: bool,
}

/// Walk every root in order, emitting matches into `sink`.
pub fn scan(config: &ScanConfig, sink: &mut dyn ItemSink) -> ScanSummary {
    let mut summary = ScanSummary::default();
    let total_roots = config.roots.len();
    let matcher = Matcher::new(&config.mode);

    if config.max_items == Some(0) {
        summary.capped = true;
        return summary;
    }

    'roots: for root in &config.roots {
        if sink.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        let root = absolute_root(root);
        sink.status(status::scanning_root(&root.display().to_string()));

        let mut walker = WalkDir::new(&root).follow_links(false);
        if let Some(depth) = config.max_depth {
            // walkdir counts the root itself as depth 0; its entries sit at 1.
            walker = walker.max_depth(depth.saturating_add(1));
        }

        for entry in walker {
            if sink.is_cancelled() {
                summary.cancelled = true;
                break 'roots;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    report_walk_error(&err);
                    continue;
                }
            };
            // Links to files count; links to folders are never descended.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let Some(kind) = matcher.classify(&name) else {
                continue;
            };
            let item = DiscoveredItem::new(
                name.into_owned(),
                entry.path().to_string_lossy().into_owned(),
                kind,
            );
            if !sink.emit(item) {
                summary.cancelled = true;
                break 'roots;
            }
            summary.found += 1;

            if config.max_items.is_some_and(|cap| summary.found >= cap) {
                summary.capped = true;
                break 'roots;
            }
        }

        summary.roots_completed += 1;
        sink.progress(root_progress(config, &summary, total_roots));
    }

    if summary.capped {
        if let Some(cap) = config.max_items {
            sink.status(status::scan_cap_reached(cap));
        }
        sink.progress(100);
    }
    summary
}

/// Filesystem scan as a background run.
pub struct ScanTask {
    label: String,
    config: ScanConfig,
}

impl ScanTask {
    pub fn new(label: impl Into<String>, config: ScanConfig) -> Self {
        Self {
            label: label.into(),
            config,
        }
    }
}

impl TaskBody for ScanTask {
    fn label(&self) -> &str {
        &self.label
    }

    fn run(&mut self, ctx: &mut TaskContext) -> Result<(), TaskFailure> {
        ctx.status(status::scan_started(self.config.roots.len()));
        let summary = scan(&self.config, ctx);
        engine_info!(
            "{} scan done: found={} roots={}/{} capped={} cancelled={}",
            self.label,
            summary.found,
            summary.roots_completed,
            self.config.roots.len(),
            summary.capped,
            summary.cancelled
        );
        let message = if summary.cancelled {
            status::scan_stopped(summary.found)
        } else {
            status::scan_finished(summary.found)
        };
        ctx.status(message);
        Ok(())
    }
}

enum Matcher<'a> {
    Table(&'a scout_core::ExtensionTable),
    Name(String),
}

impl<'a> Matcher<'a> {
    fn new(mode: &'a ScanMode) -> Self {
        match mode {
            ScanMode::Classify { table } => Matcher::Table(table),
            ScanMode::NameSearch { query } => Matcher::Name(query.to_lowercase()),
        }
    }

    fn classify(&self, file_name: &str) -> Option<ItemKind> {
        match self {
            Matcher::Table(table) => table.classify(file_name),
            Matcher::Name(query) => file_name
                .to_lowercase()
                .contains(query.as_str())
                .then_some(ItemKind::Link),
        }
    }
}

fn root_progress(config: &ScanConfig, summary: &ScanSummary, total_roots: usize) -> u8 {
    match (&config.mode, config.max_items) {
        (ScanMode::Classify { .. }, Some(cap)) => percent_of_cap(summary.found, cap),
        _ => percent_of(summary.roots_completed, total_roots),
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

fn report_walk_error(err: &walkdir::Error) {
    let path = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => {
            engine_debug!("Skipping {}: permission denied", path);
        }
        _ => engine_warn!("Abandoning {}: {}", path, err),
    }
}
