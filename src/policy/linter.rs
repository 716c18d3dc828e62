//! Policy linter — detects list entries that cannot do what they look like.
//!
//! When a user runs `hostgate check`, the linter scans both lists for:
//! - entries written as URLs, with ports, or with wildcards (they never match)
//! - hosts listed in both lists (the block always wins)
//! - allow entries shadowed by a blocked parent domain
//! - an empty allowlist (every destination is denied)

use crate::policy::types::*;
use colored::Colorize;

/// A lint warning — something the user should know about their lists.
#[derive(Debug)]
pub struct LintWarning {
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Severity {
    /// An entry that will not behave as written
    Warning,
    /// Worth knowing, not necessarily wrong
    Info,
}

impl LintWarning {
    fn warn(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: msg.into(),
            suggestion: None,
        }
    }

    fn warn_with_fix(msg: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: msg.into(),
            suggestion: Some(fix.into()),
        }
    }

    fn info(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: msg.into(),
            suggestion: None,
        }
    }

    /// Format for terminal output.
    pub fn display(&self) -> String {
        let icon = match self.severity {
            Severity::Warning => "⚠".yellow().to_string(),
            Severity::Info => "ℹ".blue().to_string(),
        };
        let mut out = format!("  {} {}", icon, self.message);
        if let Some(ref suggestion) = self.suggestion {
            out.push_str(&format!("\n    {}: {}", "Fix".green(), suggestion));
        }
        out
    }
}

/// Lint a policy set and return warnings.
pub fn lint_policy(policy: &PolicySet) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    check_entry_shapes("blocklist", &policy.blocklist, &mut warnings);
    check_entry_shapes("allowlist", &policy.allowlist, &mut warnings);
    check_conflicts(policy, &mut warnings);
    check_shadowed_allows(policy, &mut warnings);
    check_empty_allowlist(policy, &mut warnings);

    warnings
}

/// Check: is every entry a bare domain?
fn check_entry_shapes(list_name: &str, list: &HostList, warnings: &mut Vec<LintWarning>) {
    for pattern in list.iter() {
        let entry = pattern.as_str();
        if let Some(host) = bare_host_of(entry) {
            warnings.push(LintWarning::warn_with_fix(
                format!("{list_name}: '{entry}' is not a bare host and will never match"),
                format!("Replace it with '{host}'"),
            ));
        } else if entry.contains('*') {
            warnings.push(LintWarning::warn_with_fix(
                format!("{list_name}: '{entry}' uses a wildcard, which is not supported"),
                format!(
                    "List the parent domain '{}' — it already covers every subdomain",
                    entry.trim_start_matches(['*', '.'])
                ),
            ));
        }
    }
}

/// For entries like `https://x.com/path` or `x.com:443`, the host the user
/// probably meant.
fn bare_host_of(entry: &str) -> Option<String> {
    let looks_like_url = entry.contains("://") || entry.contains('/') || entry.contains('@');
    let has_port = entry
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()));
    if !looks_like_url && !has_port {
        return None;
    }
    crate::gate::extract::extract_host(entry)
        .ok()
        .map(|host| host.into_string())
        .filter(|host| host != entry)
}

/// Check: is any host in both lists?
fn check_conflicts(policy: &PolicySet, warnings: &mut Vec<LintWarning>) {
    for pattern in policy.allowlist.iter() {
        if policy.blocklist.contains(pattern) {
            warnings.push(LintWarning::warn(format!(
                "'{pattern}' is in both lists — it is blocked (the blocklist always wins)"
            )));
        }
    }
}

/// Check: is an allow entry covered by a blocked parent domain?
fn check_shadowed_allows(policy: &PolicySet, warnings: &mut Vec<LintWarning>) {
    for pattern in policy.allowlist.iter() {
        if policy.blocklist.contains(pattern) {
            continue;
        }
        if let Some(parent) = policy.blocklist.find_match(pattern.as_str()) {
            warnings.push(LintWarning::warn(format!(
                "allowlist entry '{pattern}' can never match — its parent '{parent}' is blocklisted"
            )));
        }
    }
}

/// Check: does the allowlist admit anything?
fn check_empty_allowlist(policy: &PolicySet, warnings: &mut Vec<LintWarning>) {
    if policy.allowlist.is_empty() {
        warnings.push(LintWarning::info(
            "The allowlist is empty — every network destination will be blocked.",
        ));
    }
}
