//! Deploy Event Port
//!
//! Provides an observable interface for deploy runs.
//! Enables the progress transcript, JSON event streams, and debugging.

use std::fmt;
use std::path::PathBuf;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Idle,
    Locking,
    Fetching,
    Staging,
    Indexing,
    Syncing,
    Pruning,
    CleaningUp,
    Done,
    Failed,
}

impl DeployPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployPhase::Idle => "idle",
            DeployPhase::Locking => "locking",
            DeployPhase::Fetching => "fetching",
            DeployPhase::Staging => "staging",
            DeployPhase::Indexing => "indexing",
            DeployPhase::Syncing => "syncing",
            DeployPhase::Pruning => "pruning",
            DeployPhase::CleaningUp => "cleaning_up",
            DeployPhase::Done => "done",
            DeployPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event emitted during a deploy run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Run started for a resolved revision
    Started { revision: String, root: PathBuf },

    /// Orchestrator entered a new phase
    Phase(DeployPhase),

    /// Archive downloaded
    Downloaded { bytes: u64 },

    /// Plan built
    Planned { directories: usize, files: usize },

    /// Where pre-images of this run will be stored
    BackupLocation { snapshot: PathBuf },

    /// File written to the target
    FileCopied { path: String, backed_up: bool },

    /// Stale path removed from the target
    Pruned { path: String },

    /// Stale path could not be removed
    PruneFailed { path: String, message: String },

    /// Run finished successfully
    Completed {
        copied: usize,
        pruned: usize,
        prune_failures: usize,
        dry_run: bool,
    },

    /// Run aborted
    Failed {
        message: String,
        target_touched: bool,
    },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - TextEventSink: one progress line per phase
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-file events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test event sink that records all events
    struct RecordingEventSink {
        events: Arc<Mutex<Vec<DeployEvent>>>,
    }

    impl RecordingEventSink {
        fn new() -> (Self, Arc<Mutex<Vec<DeployEvent>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    events: events.clone(),
                },
                events,
            )
        }
    }

    impl DeployEventSink for RecordingEventSink {
        fn on_event(&self, event: DeployEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let (sink, events) = RecordingEventSink::new();

        sink.on_event(DeployEvent::Started {
            revision: "acme/site @ main".to_string(),
            root: PathBuf::from("/srv/www"),
        });
        sink.on_event(DeployEvent::Phase(DeployPhase::Fetching));

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1], DeployEvent::Phase(DeployPhase::Fetching));
    }

    #[test]
    fn noop_sink_wants_no_details() {
        let sink = NoopEventSink;
        assert!(!sink.wants_detailed_events());
    }
}
