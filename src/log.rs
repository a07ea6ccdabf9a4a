//! Run log.
//!
//! Every decision, displacement, conflict and validation result of a run is
//! recorded as a [`LogEntry`] and returned to the caller. Each entry is also
//! emitted as a `tracing` event so a subscriber installed by the host
//! application sees the same stream.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Stage of the run that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Validate,
    Fixed,
    Together,
    Fill,
    Leaders,
    Arrange,
    Separate,
    Boarders,
    Move,
    Optimize,
    Verify,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Validate => "validate",
            Phase::Fixed => "fixed",
            Phase::Together => "together",
            Phase::Fill => "fill",
            Phase::Leaders => "leaders",
            Phase::Arrange => "arrange",
            Phase::Separate => "separate",
            Phase::Boarders => "boarders",
            Phase::Move => "move",
            Phase::Optimize => "optimize",
            Phase::Verify => "verify",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub phase: Phase,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "[{tag}] {}: {}", self.phase, self.message)
    }
}

/// Ordered, append-only log of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and mirrors it to `tracing`.
    pub fn push(&mut self, level: LogLevel, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => tracing::info!(phase = phase.as_str(), "{message}"),
            LogLevel::Warn => tracing::warn!(phase = phase.as_str(), "{message}"),
            LogLevel::Error => tracing::error!(phase = phase.as_str(), "{message}"),
        }
        self.entries.push(LogEntry {
            level,
            phase,
            message,
        });
    }

    pub fn info(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(LogLevel::Info, phase, message);
    }

    pub fn warn(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(LogLevel::Warn, phase, message);
    }

    pub fn error(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(LogLevel::Error, phase, message);
    }

    /// All entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries of one phase.
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.phase == phase)
    }

    /// Entries at or above a level.
    pub fn at_least(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.level >= level)
    }

    /// Whether any entry of `phase` contains `needle`.
    pub fn mentions(&self, phase: Phase, needle: &str) -> bool {
        self.in_phase(phase).any(|e| e.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered lines, one per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_filter() {
        let mut log = RunLog::new();
        log.info(Phase::Fixed, "placed Ari");
        log.warn(Phase::Leaders, "group 2 has no leader");
        log.error(Phase::Fixed, "group 9 is not enabled");

        assert_eq!(log.len(), 3);
        assert_eq!(log.in_phase(Phase::Fixed).count(), 2);
        assert_eq!(log.at_least(LogLevel::Warn).count(), 2);
        assert!(log.mentions(Phase::Leaders, "no leader"));
        assert!(!log.mentions(Phase::Fixed, "no leader"));
    }

    #[test]
    fn test_render() {
        let mut log = RunLog::new();
        log.warn(Phase::Boarders, "spread is 2");
        assert_eq!(log.lines(), vec!["[warn] boarders: spread is 2".to_string()]);
    }
}
