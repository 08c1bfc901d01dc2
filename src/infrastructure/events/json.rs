//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON form of one event
pub(crate) fn to_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started { revision, root } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "revision": revision,
            "root": root.display().to_string(),
        }),

        DeployEvent::Phase(phase) => serde_json::json!({
            "event": "phase",
            "command": "deploy",
            "phase": phase.as_str(),
        }),

        DeployEvent::Downloaded { bytes } => serde_json::json!({
            "event": "downloaded",
            "command": "deploy",
            "bytes": bytes,
        }),

        DeployEvent::Planned { directories, files } => serde_json::json!({
            "event": "planned",
            "command": "deploy",
            "directories": directories,
            "files": files,
        }),

        DeployEvent::BackupLocation { snapshot } => serde_json::json!({
            "event": "backup_location",
            "command": "deploy",
            "snapshot": snapshot.display().to_string(),
        }),

        DeployEvent::FileCopied { path, backed_up } => serde_json::json!({
            "event": "item_written",
            "command": "deploy",
            "path": path,
            "backed_up": backed_up,
        }),

        DeployEvent::Pruned { path } => serde_json::json!({
            "event": "item_pruned",
            "command": "deploy",
            "path": path,
        }),

        DeployEvent::PruneFailed { path, message } => serde_json::json!({
            "event": "item_error",
            "command": "deploy",
            "path": path,
            "error": message,
        }),

        DeployEvent::Completed {
            copied,
            pruned,
            prune_failures,
            dry_run,
        } => {
            let status = if *prune_failures == 0 {
                "success"
            } else {
                "partial"
            };
            serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": status,
                "copied": copied,
                "pruned": pruned,
                "prune_failures": prune_failures,
                "dry_run": dry_run,
            })
        }

        DeployEvent::Failed {
            message,
            target_touched,
        } => serde_json::json!({
            "event": "error",
            "command": "deploy",
            "message": message,
            "target_touched": target_touched,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(to_json(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DeployPhase;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn one_json_object_per_line() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::Started {
            revision: "acme/site @ main".to_string(),
            root: PathBuf::from("/srv/www"),
        });
        sink.on_event(DeployEvent::Phase(DeployPhase::CleaningUp));

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["revision"], "acme/site @ main");
        assert_eq!(events[1]["phase"], "cleaning_up");
    }

    #[test]
    fn complete_is_partial_when_prune_entries_failed() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::Completed {
            copied: 3,
            pruned: 1,
            prune_failures: 1,
            dry_run: false,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "partial");
        assert_eq!(events[0]["copied"], 3);
    }

    #[test]
    fn failure_reports_target_touched() {
        let event = to_json(&DeployEvent::Failed {
            message: "copy failed".to_string(),
            target_touched: true,
        });
        assert_eq!(event["event"], "error");
        assert_eq!(event["target_touched"], true);
    }
}
