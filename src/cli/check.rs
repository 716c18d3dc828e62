//! `hostgate check` — validate the lists and configuration in a gate home.

use crate::policy::{linter, parser};
use crate::utils::paths;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Run the `hostgate check` command.
///
/// A malformed `hostgate.yaml` is an error here even though the hook falls
/// back to defaults, so the operator finds out before the agent does.
pub fn run_check(home: &Path) -> Result<()> {
    let config_path = paths::config_path(home);
    let config = parser::parse_config_file(&config_path)
        .with_context(|| format!("Configuration {} is invalid", config_path.display()))?;
    let policy = parser::load_policy_set(home);

    println!();
    println!("  {} Gate home: {}", "✓".green().bold(), home.display().to_string().cyan());
    println!(
        "  Blocklist: {} {}",
        policy.blocklist.len(),
        list_status(&paths::blocklist_path(home))
    );
    println!(
        "  Allowlist: {} {}",
        policy.allowlist.len(),
        list_status(&paths::allowlist_path(home))
    );
    println!(
        "  Unparsable hosts: {} | Search queries scanned: {} | Audit log: {}",
        match config.on_unparsable_host {
            crate::policy::UnparsableHost::Block => "block",
            crate::policy::UnparsableHost::Allow => "allow",
        },
        yes_no(config.scan_search_queries),
        yes_no(config.audit_log),
    );
    if !config.extra_network_tools.is_empty() {
        println!("  Extra network tools: {}", config.extra_network_tools.join(", "));
    }

    let warnings = linter::lint_policy(&policy);
    println!();
    if warnings.is_empty() {
        println!("  {} No issues found — lists look solid.", "✓".green());
    } else {
        println!(
            "  {} {} {}:",
            "─".repeat(20).dimmed(),
            warnings.len(),
            if warnings.len() == 1 { "suggestion" } else { "suggestions" }
        );
        println!();
        for warning in &warnings {
            println!("{}", warning.display());
        }
    }
    println!();

    Ok(())
}

fn list_status(path: &Path) -> String {
    if path.exists() {
        format!("({})", path.display()).dimmed().to_string()
    } else {
        "(file missing — treated as empty)".yellow().to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
