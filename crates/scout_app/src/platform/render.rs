use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use scout_core::TaskEvent;
use serde::Serialize;

/// How events are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    JsonLines,
}

/// Text progress is only printed every this many percent.
const TEXT_PROGRESS_STEP: u8 = 10;

#[derive(Serialize)]
struct JsonLine<'a> {
    at: String,
    #[serde(flatten)]
    event: &'a TaskEvent,
}

#[derive(Serialize)]
struct SavedLine<'a> {
    at: String,
    event: &'static str,
    path: &'a Path,
}

pub(crate) struct EventRenderer<W: Write> {
    out: W,
    format: OutputFormat,
    clock: fn() -> String,
    last_progress: Option<u8>,
}

impl<W: Write> EventRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self::with_clock(out, format, local_timestamp)
    }

    pub fn with_clock(out: W, format: OutputFormat, clock: fn() -> String) -> Self {
        Self {
            out,
            format,
            clock,
            last_progress: None,
        }
    }

    pub fn render(&mut self, event: &TaskEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                let line = JsonLine {
                    at: (self.clock)(),
                    event,
                };
                serde_json::to_writer(&mut self.out, &line)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => self.render_text(event)?,
        }
        self.out.flush()
    }

    pub fn render_saved(&mut self, path: &Path) -> io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                let line = SavedLine {
                    at: (self.clock)(),
                    event: "saved",
                    path,
                };
                serde_json::to_writer(&mut self.out, &line)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => {
                writeln!(self.out, "{} Saved {}", (self.clock)(), path.display())?;
            }
        }
        self.out.flush()
    }

    fn render_text(&mut self, event: &TaskEvent) -> io::Result<()> {
        match event {
            TaskEvent::Discovered { item, .. } => {
                writeln!(
                    self.out,
                    "[{:<10}] {}  {}",
                    item.kind.as_str(),
                    item.name,
                    item.location
                )
            }
            TaskEvent::Progress { percent, .. } => {
                let due = match self.last_progress {
                    None => true,
                    Some(last) if last == *percent => false,
                    Some(last) => {
                        *percent >= last.saturating_add(TEXT_PROGRESS_STEP) || *percent == 100
                    }
                };
                if !due {
                    return Ok(());
                }
                self.last_progress = Some(*percent);
                writeln!(self.out, "{} {:>3}%", (self.clock)(), percent)
            }
            TaskEvent::Status { message, .. } => {
                writeln!(self.out, "{} {}", (self.clock)(), message)
            }
            TaskEvent::Completed {
                items_emitted,
                cancelled,
                ..
            } => {
                let verb = if *cancelled { "Cancelled" } else { "Done" };
                writeln!(self.out, "{} {}: {} item(s)", (self.clock)(), verb, items_emitted)
            }
            TaskEvent::Failed { reason, .. } => {
                writeln!(self.out, "{} Failed: {}", (self.clock)(), reason)
            }
        }
    }
}

fn local_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_core::{DiscoveredItem, ItemKind, TaskFailure};

    fn fixed_clock() -> String {
        "12:00:00".to_string()
    }

    fn render_all(format: OutputFormat, events: &[TaskEvent]) -> String {
        let mut buffer = Vec::new();
        {
            let mut renderer = EventRenderer::with_clock(&mut buffer, format, fixed_clock);
            for event in events {
                renderer.render(event).unwrap();
            }
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn text_lines_for_a_short_run() {
        let events = vec![
            TaskEvent::Status {
                run_id: 1,
                message: "Scanning /photos".into(),
            },
            TaskEvent::Discovered {
                run_id: 1,
                item: DiscoveredItem::new("cat.png", "/photos/cat.png", ItemKind::Image),
            },
            TaskEvent::Progress {
                run_id: 1,
                percent: 100,
            },
            TaskEvent::Completed {
                run_id: 1,
                items_emitted: 1,
                cancelled: false,
            },
        ];

        assert_eq!(
            render_all(OutputFormat::Text, &events),
            "12:00:00 Scanning /photos\n\
             [image     ] cat.png  /photos/cat.png\n\
             12:00:00 100%\n\
             12:00:00 Done: 1 item(s)\n"
        );
    }

    #[test]
    fn text_progress_is_thinned() {
        let events: Vec<TaskEvent> = [10u8, 12, 15, 21, 25, 31, 100]
            .into_iter()
            .map(|percent| TaskEvent::Progress { run_id: 1, percent })
            .collect();

        assert_eq!(
            render_all(OutputFormat::Text, &events),
            "12:00:00  10%\n12:00:00  21%\n12:00:00  31%\n12:00:00 100%\n"
        );
    }

    #[test]
    fn failures_show_the_reason() {
        let events = vec![TaskEvent::Failed {
            run_id: 3,
            reason: TaskFailure::HttpStatus { code: 404 },
        }];
        assert_eq!(
            render_all(OutputFormat::Text, &events),
            "12:00:00 Failed: http request failed with status 404\n"
        );
    }

    #[test]
    fn json_lines_carry_the_event_tag() {
        let events = vec![
            TaskEvent::Discovered {
                run_id: 2,
                item: DiscoveredItem::new("a.pdf", "/docs/a.pdf", ItemKind::Pdf),
            },
            TaskEvent::Completed {
                run_id: 2,
                items_emitted: 1,
                cancelled: true,
            },
        ];

        let output = render_all(OutputFormat::JsonLines, &events);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(
            lines,
            vec![
                serde_json::json!({
                    "at": "12:00:00",
                    "event": "discovered",
                    "run_id": 2,
                    "item": {"name": "a.pdf", "location": "/docs/a.pdf", "kind": "pdf"}
                }),
                serde_json::json!({
                    "at": "12:00:00",
                    "event": "completed",
                    "run_id": 2,
                    "items_emitted": 1,
                    "cancelled": true
                }),
            ]
        );
    }

    #[test]
    fn saved_path_is_reported() {
        let mut buffer = Vec::new();
        EventRenderer::with_clock(&mut buffer, OutputFormat::Text, fixed_clock)
            .render_saved(Path::new("/tmp/cat.png"))
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "12:00:00 Saved /tmp/cat.png\n");
    }
}
