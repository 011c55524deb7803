//! Structured record of what a migration observed.
//!
//! Core operations never print. They push `MigrationEvent`s into an
//! `EventLog`, and the command layer decides how (or whether) to render them.

use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Detail,
    Info,
    Success,
    Warning,
    Error,
}

impl EventLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Detail => "detail",
            EventLevel::Info => "info",
            EventLevel::Success => "success",
            EventLevel::Warning => "warning",
            EventLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationEvent {
    pub level: EventLevel,
    /// Stable snake_case tag, e.g. `destination_exists`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<MigrationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        level: EventLevel,
        kind: &str,
        path: Option<&Path>,
        message: impl Into<String>,
    ) {
        self.events.push(MigrationEvent {
            level,
            kind: kind.to_string(),
            path: path.map(|p| p.display().to_string()),
            message: message.into(),
        });
    }

    pub fn detail(&mut self, kind: &str, path: &Path, message: impl Into<String>) {
        self.push(EventLevel::Detail, kind, Some(path), message);
    }

    pub fn info(&mut self, kind: &str, path: &Path, message: impl Into<String>) {
        self.push(EventLevel::Info, kind, Some(path), message);
    }

    pub fn success(&mut self, kind: &str, path: &Path, message: impl Into<String>) {
        self.push(EventLevel::Success, kind, Some(path), message);
    }

    pub fn warning(&mut self, kind: &str, path: &Path, message: impl Into<String>) {
        self.push(EventLevel::Warning, kind, Some(path), message);
    }

    pub fn error(&mut self, kind: &str, path: &Path, message: impl Into<String>) {
        self.push(EventLevel::Error, kind, Some(path), message);
    }

    pub fn events(&self) -> &[MigrationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<MigrationEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of the given kind, in the order they were recorded.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a MigrationEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn has_errors(&self) -> bool {
        self.events.iter().any(|e| e.level == EventLevel::Error)
    }
}
