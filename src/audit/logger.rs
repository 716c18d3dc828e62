//! Audit log writer — append-only JSONL files.
//!
//! Writes to `~/.hostgate/logs/{session_id}.jsonl`, one JSON object per line,
//! flushed after every write. The hook opens a logger per call, so a session
//! file collects entries across many short-lived processes.

use crate::audit::types::LogEntry;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only audit logger that writes JSONL files.
pub struct AuditLogger {
    log_path: PathBuf,
    file: File,
    entry_count: usize,
}

impl AuditLogger {
    /// Open (or create) the log for a session in the default directory.
    pub fn new(session_id: &str) -> Result<Self> {
        let log_dir = Self::log_directory()?;
        Self::with_path(log_dir.join(session_file_name(session_id)))
    }

    /// Create a logger writing to a specific path.
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self> {
        let log_path = path.as_ref().to_path_buf();
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            log_path,
            file,
            entry_count: 0,
        })
    }

    /// Append one entry and flush.
    pub fn log(&mut self, entry: &LogEntry) -> Result<()> {
        let json = serde_json::to_string(entry).context("Failed to serialize log entry")?;
        writeln!(self.file, "{}", json).context("Failed to write log entry")?;
        self.file.flush().context("Failed to flush log file")?;
        self.entry_count += 1;
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Number of entries written through this logger.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Get the default log directory (~/.hostgate/logs/).
    pub fn log_directory() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".hostgate").join("logs"))
    }
}

/// Session ids come from the agent; keep them from escaping the log directory.
pub(crate) fn session_file_name(session_id: &str) -> String {
    let safe: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.jsonl", safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::collect::Invocation;
    use crate::policy::types::{Cause, Decision, Verdict};
    use tempfile::TempDir;

    fn blocked_entry(target: &str) -> LogEntry {
        let decision = Decision {
            verdict: Verdict::Block,
            host: Some("pastebin.com".to_string()),
            reason: "host 'pastebin.com' is blocklisted (matches 'pastebin.com')".to_string(),
            cause: Cause::Blocklisted,
            matched_pattern: Some("pastebin.com".to_string()),
        };
        LogEntry::new(
            "test-session",
            "WebFetch",
            &Invocation::DirectUrl(target.to_string()),
            &decision,
            Some(42),
        )
    }

    #[test]
    fn test_write_and_read_log() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("logs/test.jsonl");
        let mut logger = AuditLogger::with_path(&log_path).unwrap();

        logger.log(&blocked_entry("https://pastebin.com/raw/x")).unwrap();
        assert_eq!(logger.entry_count(), 1);

        let content = fs::read_to_string(&log_path).unwrap();
        let parsed: LogEntry = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed.session_id, "test-session");
        assert_eq!(parsed.target, "https://pastebin.com/raw/x");
        assert_eq!(parsed.decision.verdict, Verdict::Block);
        assert_eq!(parsed.eval_duration_us, Some(42));
    }

    #[test]
    fn test_append_across_loggers() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("test.jsonl");

        for i in 0..3 {
            let mut logger = AuditLogger::with_path(&log_path).unwrap();
            logger.log(&blocked_entry(&format!("https://pastebin.com/{i}"))).unwrap();
        }

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.trim().lines().count(), 3);
    }

    #[test]
    fn test_session_file_name_sanitized() {
        assert_eq!(session_file_name("abc-123_x"), "abc-123_x.jsonl");
        assert_eq!(session_file_name("../../etc/passwd"), "______etc_passwd.jsonl");
    }
}
