//! Event Sink Implementations
//!
//! Concrete implementations of DeployEventSink:
//! - TextEventSink: the human-readable progress transcript
//! - JsonEventSink: NDJSON output for CI/automation

mod json;
mod text;

pub use json::JsonEventSink;
pub use text::{render, TextEventSink};
