//! `hostgate log` — browse the audit log.
//!
//! Shows every network call an agent attempted in a session, and which
//! destinations were stopped.

use crate::audit::{AuditReader, LogFilter, SessionSummary};
use crate::policy::types::Verdict;
use anyhow::{Context, Result};
use colored::Colorize;

/// Run the `hostgate log` command.
pub fn run_log(
    reader: &AuditReader,
    session_id: Option<&str>,
    blocked_only: bool,
    limit: Option<usize>,
    summary_only: bool,
) -> Result<()> {
    let entries = match session_id {
        Some(sid) => reader
            .read_session(sid)
            .with_context(|| format!("Failed to read session: {}", sid))?,
        None => reader.read_latest_session()?,
    };

    if entries.is_empty() {
        println!();
        println!("  {} No audit logs found.", "ℹ".blue());
        println!("  Entries appear once hostgate-hook has handled a tool call.");
        println!();
        return Ok(());
    }

    let summary = AuditReader::summarize(&entries);

    if summary_only {
        print_summary(&summary);
        return Ok(());
    }

    let filter = LogFilter {
        session_id: session_id.map(str::to_string),
        verdict: blocked_only.then_some(Verdict::Block),
        limit,
    };
    let filtered = AuditReader::filter_entries(&entries, &filter);

    println!();
    println!("  Session: {}", summary.session_id.cyan());
    println!();
    for entry in &filtered {
        println!("  {}", AuditReader::format_entry(entry));
    }
    println!();
    println!("  {} {}", "─".repeat(40).dimmed(), summary.one_line().dimmed());
    println!();

    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!("  {} Session: {}", "📋".bold(), summary.session_id.cyan());
    println!();
    println!(
        "  {} total | {} allowed | {} blocked",
        summary.total_calls.to_string().bold(),
        summary.allowed.to_string().green().bold(),
        summary.blocked.to_string().red().bold(),
    );
    if let (Some(start), Some(end)) = (summary.start_time, summary.end_time) {
        println!("  Duration: {}", format_duration((end - start).num_seconds()));
    }
    if !summary.blocked_hosts.is_empty() {
        println!();
        println!("  Blocked hosts:");
        for (host, count) in &summary.blocked_hosts {
            println!("    {} ×{}", host.red(), count);
        }
    }
    println!();
}

/// List available sessions.
pub fn run_log_list(reader: &AuditReader) -> Result<()> {
    let sessions = reader.list_sessions()?;

    println!();
    if sessions.is_empty() {
        println!("  {} No sessions found.", "ℹ".blue());
        println!();
        return Ok(());
    }

    println!("  {} Available sessions:", "📋".bold());
    println!();
    for session in &sessions {
        println!("  • {}", session);
    }
    println!();
    println!("  View a session: {}", "hostgate log --session <id>".dimmed());
    println!();

    Ok(())
}

fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
