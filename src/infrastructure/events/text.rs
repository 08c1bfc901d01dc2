//! Text Event Sink
//!
//! The human-readable progress transcript: one line per phase, plus per-file
//! lines in verbose mode.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink, DeployPhase};

/// Event sink that prints progress lines
pub struct TextEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl TextEventSink {
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }
}

impl DeployEventSink for TextEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some(line) = render(&event, self.verbose) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}

/// Transcript line for `event`, if it has one.
pub fn render(event: &DeployEvent, verbose: bool) -> Option<String> {
    match event {
        DeployEvent::Started { revision, .. } => Some(format!("Deploying {revision}")),
        DeployEvent::Phase(phase) => phase_line(*phase).map(str::to_string),
        DeployEvent::Downloaded { bytes } => Some(format!("Downloaded {bytes} bytes")),
        DeployEvent::Planned { directories, files } => {
            Some(format!("Plan: {directories} directories, {files} files"))
        }
        DeployEvent::BackupLocation { snapshot } => Some(format!(
            "Backing up overwritten files to {}/overwritten",
            snapshot.display().to_string().replace('\\', "/")
        )),
        DeployEvent::FileCopied { path, backed_up } if verbose => Some(if *backed_up {
            format!("  updated {path}")
        } else {
            format!("  added {path}")
        }),
        DeployEvent::Pruned { path } if verbose => Some(format!("  removed {path}")),
        DeployEvent::FileCopied { .. } | DeployEvent::Pruned { .. } => None,
        DeployEvent::PruneFailed { path, message } => {
            Some(format!("  warning: could not remove {path}: {message}"))
        }
        DeployEvent::Completed {
            copied,
            pruned,
            prune_failures,
            dry_run,
        } => {
            let mut line = if *dry_run {
                format!(
                    "Dry run complete. {copied} files would be copied, {pruned} paths would be removed."
                )
            } else {
                format!("Deploy complete. {copied} files copied, {pruned} paths removed.")
            };
            if *prune_failures > 0 {
                line.push_str(&format!(" {prune_failures} paths could not be removed."));
            }
            Some(line)
        }
        DeployEvent::Failed {
            message,
            target_touched,
        } => {
            let mut line = format!("Deploy failed: {message}");
            if *target_touched {
                line.push_str(
                    "\n  the target was partially updated; pre-images are in the backup snapshot",
                );
            }
            Some(line)
        }
    }
}

fn phase_line(phase: DeployPhase) -> Option<&'static str> {
    match phase {
        DeployPhase::Fetching => Some("Downloading archive..."),
        DeployPhase::Staging => Some("Staging..."),
        DeployPhase::Indexing => Some("Indexing source..."),
        DeployPhase::Syncing => Some("Syncing files..."),
        DeployPhase::Pruning => Some("Pruning removed files..."),
        DeployPhase::CleaningUp => Some("Cleaning up temp..."),
        DeployPhase::Idle | DeployPhase::Locking | DeployPhase::Done | DeployPhase::Failed => None,
    }
}
