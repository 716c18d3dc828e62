//! Loaders for the host lists and the gate configuration.
//!
//! The host lists are plain text — one pattern per line, designed to be
//! edited by hand:
//! ```text
//! # paste sites
//! pastebin.com
//!   Transfer.SH
//!
//! webhook.site
//! ```
//! Comment lines (`#` after optional whitespace) and blank lines are skipped;
//! everything else is trimmed and lowercased.
//!
//! Lists are re-read for every decision, so edits apply on the next call.
//! A missing list is an empty list, never an error.

use crate::policy::config::GateConfig;
use crate::policy::types::{HostList, PolicySet};
use crate::utils::paths;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Parse the text of one host list.
pub fn parse_host_list_str(content: &str) -> HostList {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Read one host list from disk. Missing files are empty lists; any other
/// read failure is logged and also treated as empty (default-deny still holds
/// because an empty allowlist admits nothing).
pub fn load_host_list(path: impl AsRef<Path>) -> HostList {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => parse_host_list_str(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Host list {} not found, using empty list", path.display());
            HostList::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read host list {}: {}", path.display(), e);
            HostList::new()
        }
    }
}

/// Load both lists from a gate home directory.
pub fn load_policy_set(home: impl AsRef<Path>) -> PolicySet {
    let home = home.as_ref();
    PolicySet::new(
        load_host_list(paths::blocklist_path(home)),
        load_host_list(paths::allowlist_path(home)),
    )
}

/// Parse a YAML gate configuration.
pub fn parse_config_str(yaml: &str) -> Result<GateConfig> {
    if yaml.trim().is_empty() {
        return Ok(GateConfig::default());
    }
    serde_yaml::from_str(yaml).context("Invalid YAML in gate configuration")
}

/// Read the gate configuration. A missing file yields the defaults.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<GateConfig> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GateConfig::default()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read config file: {}", path.display()))
        }
    };
    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load the configuration for a gate home, falling back to the (strict)
/// defaults when the file is broken. The gate must always reach a verdict.
pub fn load_config(home: impl AsRef<Path>) -> GateConfig {
    match parse_config_file(paths::config_path(home.as_ref())) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{:#}; using default configuration", e);
            GateConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::config::UnparsableHost;
    use crate::policy::types::HostPattern;
    use tempfile::TempDir;

    #[test]
    fn test_parse_list_skips_comments_and_blanks() {
        let list = parse_host_list_str(
            "# paste sites\npastebin.com\n\n   # indented comment\n  Transfer.SH  \n\t\nwebhook.site\n",
        );
        assert_eq!(list.len(), 3);
        assert!(list.contains(&HostPattern::new("transfer.sh").unwrap()));
        assert!(list.contains(&HostPattern::new("pastebin.com").unwrap()));
    }

    #[test]
    fn test_parse_list_handles_crlf() {
        let list = parse_host_list_str("github.com\r\ncrates.io\r\n");
        assert!(list.find_match("github.com").is_some());
        assert!(list.find_match("crates.io").is_some());
    }

    #[test]
    fn test_missing_list_is_empty() {
        let tmp = TempDir::new().unwrap();
        let list = load_host_list(tmp.path().join("nope.txt"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_load_policy_set_from_home() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("blocklist.txt"), "catbox.moe\n").unwrap();
        std::fs::write(tmp.path().join("allowlist.txt"), "github.com\ncrates.io\n").unwrap();

        let policy = load_policy_set(tmp.path());
        assert_eq!(policy.blocklist.len(), 1);
        assert_eq!(policy.allowlist.len(), 2);
    }

    #[test]
    fn test_edits_visible_on_next_load() {
        let tmp = TempDir::new().unwrap();
        let allow = tmp.path().join("allowlist.txt");
        std::fs::write(&allow, "github.com\n").unwrap();
        assert!(load_policy_set(tmp.path()).allowlist.find_match("gitlab.com").is_none());

        std::fs::write(&allow, "github.com\ngitlab.com\n").unwrap();
        assert!(load_policy_set(tmp.path()).allowlist.find_match("gitlab.com").is_some());
    }

    #[test]
    fn test_config_missing_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = parse_config_file(tmp.path().join("hostgate.yaml")).unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn test_config_parses_all_fields() {
        let config = parse_config_str(
            r#"
on_unparsable_host: allow
scan_search_queries: false
audit_log: false
extra_network_tools: [httpx, gh]
"#,
        )
        .unwrap();
        assert_eq!(config.on_unparsable_host, UnparsableHost::Allow);
        assert!(!config.scan_search_queries);
        assert!(!config.audit_log);
        assert_eq!(config.extra_network_tools, vec!["httpx", "gh"]);
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        assert!(parse_config_str("on_unparseable_host: allow\n").is_err());
        assert!(parse_config_str("on_unparsable_host: maybe\n").is_err());
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("hostgate.yaml"), "on_unparsable_host: [\n").unwrap();
        assert_eq!(load_config(tmp.path()), GateConfig::default());
    }
}
