//! hostgate-hook — PreToolUse hook that gates outbound network access.
//!
//! Called by the agent before every tool use. It reads the tool call JSON
//! from stdin, decides whether the call reaches a permitted host, and either:
//!   - Exits 0 with no output (allow)
//!   - Prints `{"decision":"block","reason":...}` to stdout, the reason to
//!     stderr, and exits 2 (block)
//!
//! The host lists are read fresh on every call, so edits take effect on the
//! next tool use. Every decision is appended to the audit log.
//!
//! Stdin format:
//! {
//!   "session_id": "...",
//!   "cwd": "/project/path",
//!   "hook_event_name": "PreToolUse",
//!   "tool_name": "WebFetch",
//!   "tool_input": { "url": "https://example.com" }
//! }

use hostgate::audit::{AuditLogger, LogEntry};
use hostgate::gate::protocol::{HookInput, HookResponse, EXIT_BLOCK};
use hostgate::gate::{Gate, Invocation};
use hostgate::policy::types::Decision;
use hostgate::utils::paths;
use std::io::Read;
use std::process;
use std::time::Instant;

const DEFAULT_SESSION: &str = "hostgate-hook";

fn main() {
    init_tracing();

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::warn!("Failed to read hook input: {}", e);
        process::exit(0);
    }

    // A descriptor we cannot read carries no destination to check.
    let hook_input = match HookInput::parse(&input) {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!("Malformed hook input, nothing to check: {}", e);
            process::exit(0);
        }
    };

    // Without a gate home there are no lists to read, which is the same as
    // two empty lists: every destination is denied.
    let gate = match paths::gate_home() {
        Ok(home) => Gate::load(home),
        Err(e) => {
            tracing::warn!("{:#}; using empty host lists", e);
            Gate::new(".", Default::default(), Default::default())
        }
    };

    let invocation = match hook_input.invocation(gate.config().scan_search_queries) {
        Some(inv) => inv,
        None => process::exit(0),
    };

    let start = Instant::now();
    let decision = gate.decide(&invocation);
    let eval_us = start.elapsed().as_micros() as u64;

    tracing::debug!(
        tool = %hook_input.tool_name,
        verdict = %decision.verdict,
        "{}",
        decision.reason
    );

    if gate.config().audit_log {
        let session_id = hook_input.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
        log_decision(session_id, &hook_input.tool_name, &invocation, &decision, eval_us);
    }

    if let Some(response) = HookResponse::from_decision(&decision) {
        match serde_json::to_string(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!("Failed to serialize block response: {}", e),
        }
        eprintln!("{}", response.reason);
        process::exit(EXIT_BLOCK);
    }

    process::exit(0);
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("HOSTGATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hostgate=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Log a decision to the audit log (best-effort).
fn log_decision(
    session_id: &str,
    tool: &str,
    invocation: &Invocation,
    decision: &Decision,
    eval_us: u64,
) {
    let entry = LogEntry::new(session_id, tool, invocation, decision, Some(eval_us));
    if let Err(e) = AuditLogger::new(session_id).and_then(|mut logger| logger.log(&entry)) {
        tracing::debug!("Audit log skipped: {:#}", e);
    }
}
