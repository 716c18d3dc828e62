//! Types for the hostgate audit log.
//!
//! Every decision the hook makes gets logged, allowed or blocked, so the
//! operator can see afterwards which destinations an agent tried to reach.

use crate::gate::collect::Invocation;
use crate::policy::types::{Decision, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest invocation text kept in a log entry, in characters.
pub const MAX_TARGET_CHARS: usize = 200;

/// A single entry in the audit log.
/// One entry per intercepted tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the call was intercepted
    pub timestamp: DateTime<Utc>,

    /// Session identifier supplied by the agent
    pub session_id: String,

    /// Agent tool name (e.g., "WebFetch", "Bash")
    pub tool: String,

    /// Invocation shape: "url", "command" or "query"
    pub kind: String,

    /// The invocation text, truncated to [`MAX_TARGET_CHARS`]
    pub target: String,

    /// The decision that was made
    pub decision: Decision,

    /// How long the decision took (microseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_duration_us: Option<u64>,
}

impl LogEntry {
    pub fn new(
        session_id: &str,
        tool: &str,
        invocation: &Invocation,
        decision: &Decision,
        eval_duration_us: Option<u64>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            tool: tool.to_string(),
            kind: invocation.kind().to_string(),
            target: truncate(invocation.text(), MAX_TARGET_CHARS),
            decision: decision.clone(),
            eval_duration_us,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Summary statistics for a session's audit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_calls: usize,
    pub allowed: usize,
    pub blocked: usize,
    /// Blocked hosts and how often each was attempted
    pub blocked_hosts: BTreeMap<String, usize>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Format as a human-readable one-liner for terminal output.
    pub fn one_line(&self) -> String {
        format!(
            "{} calls | {} allowed | {} blocked",
            self.total_calls, self.allowed, self.blocked
        )
    }
}

/// Filter criteria for querying audit logs.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub session_id: Option<String>,
    pub verdict: Option<Verdict>,
    pub limit: Option<usize>,
}
