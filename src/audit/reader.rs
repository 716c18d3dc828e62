//! Audit log reader — filter and display session logs.
//!
//! Reads JSONL log files and provides filtering, summarization,
//! and pretty-printing for the `hostgate log` command.

use crate::audit::logger::{session_file_name, AuditLogger};
use crate::audit::types::*;
use crate::policy::types::Verdict;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and queries audit log files.
pub struct AuditReader {
    log_dir: PathBuf,
}

impl AuditReader {
    /// Create a reader using the default log directory.
    pub fn new() -> Result<Self> {
        let log_dir = AuditLogger::log_directory()?;
        Ok(Self { log_dir })
    }

    /// Create a reader for a specific directory.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            log_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Read all entries from a session log file.
    pub fn read_session(&self, session_id: &str) -> Result<Vec<LogEntry>> {
        self.read_file(&self.log_dir.join(session_file_name(session_id)))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<LogEntry>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse log entry at line {}", i + 1))
            })
            .collect()
    }

    /// Read entries from the most recently written session.
    pub fn read_latest_session(&self) -> Result<Vec<LogEntry>> {
        match self.find_latest_session()? {
            Some(path) => self.read_file(&path),
            None => Ok(Vec::new()),
        }
    }

    fn session_files(&self) -> Result<Vec<PathBuf>> {
        if !self.log_dir.exists() {
            return Ok(Vec::new());
        }
        let files = fs::read_dir(&self.log_dir)
            .with_context(|| format!("Failed to list {}", self.log_dir.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "jsonl"))
            .collect();
        Ok(files)
    }

    fn find_latest_session(&self) -> Result<Option<PathBuf>> {
        let mut files = self.session_files()?;
        files.sort_by_key(|p| fs::metadata(p).and_then(|m| m.modified()).ok());
        Ok(files.pop())
    }

    /// List all available session IDs, sorted.
    pub fn list_sessions(&self) -> Result<Vec<String>> {
        let mut sessions: Vec<String> = self
            .session_files()?
            .iter()
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        sessions.sort();
        Ok(sessions)
    }

    /// Filter entries based on criteria.
    pub fn filter_entries(entries: &[LogEntry], filter: &LogFilter) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|e| {
                filter
                    .session_id
                    .as_ref()
                    .map_or(true, |session| e.session_id == *session)
            })
            .filter(|e| filter.verdict.map_or(true, |v| e.decision.verdict == v))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Generate a summary for a set of log entries.
    pub fn summarize(entries: &[LogEntry]) -> SessionSummary {
        let mut summary = SessionSummary::default();

        if let Some(first) = entries.first() {
            summary.session_id = first.session_id.clone();
            summary.start_time = Some(first.timestamp);
        }
        if let Some(last) = entries.last() {
            summary.end_time = Some(last.timestamp);
        }

        summary.total_calls = entries.len();
        for entry in entries {
            match entry.decision.verdict {
                Verdict::Allow => summary.allowed += 1,
                Verdict::Block => {
                    summary.blocked += 1;
                    let host = entry
                        .decision
                        .host
                        .clone()
                        .unwrap_or_else(|| "(unknown)".to_string());
                    *summary.blocked_hosts.entry(host).or_default() += 1;
                }
            }
        }

        summary
    }

    /// Pretty-print a log entry for terminal display.
    pub fn format_entry(entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S").to_string();
        let verdict = match entry.decision.verdict {
            Verdict::Allow => "ALLOWED".green().to_string(),
            Verdict::Block => "BLOCKED".red().to_string(),
        };

        let mut line = format!(
            "[{}] {} {} -> {}",
            timestamp.dimmed(),
            verdict,
            entry.tool.bold(),
            entry.target
        );
        if entry.decision.is_blocked() {
            line.push_str(&format!(" ({})", entry.decision.reason.dimmed()));
        }
        line
    }
}
