//! Path and host normalization helpers.
//!
//! The gate's policy files live in a fixed layout under the "gate home":
//! the directory holding the running executable, unless `HOSTGATE_HOME`
//! points somewhere else.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the gate home.
pub const HOME_ENV: &str = "HOSTGATE_HOME";

pub const BLOCKLIST_FILE: &str = "blocklist.txt";
pub const ALLOWLIST_FILE: &str = "allowlist.txt";
pub const CONFIG_FILE: &str = "hostgate.yaml";

/// Resolve the gate home directory.
pub fn gate_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let exe = std::env::current_exe().context("Could not locate the hostgate executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("hostgate executable has no parent directory")
}

pub fn blocklist_path(home: &Path) -> PathBuf {
    home.join(BLOCKLIST_FILE)
}

pub fn allowlist_path(home: &Path) -> PathBuf {
    home.join(ALLOWLIST_FILE)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

/// Normalize a host or host pattern for structural comparison.
/// Trims whitespace, lowercases, and drops a trailing root dot
/// (`Evil.COM.` and `evil.com` are the same name).
pub fn normalize_host(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_lowercase()
}

/// Basename of a shell word, so `/usr/bin/curl` compares as `curl`.
pub fn program_name(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}
