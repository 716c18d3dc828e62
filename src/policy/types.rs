//! Core types for the hostgate policy engine.
//!
//! These types define the two host lists, the verdicts, and the decisions
//! that form the heart of hostgate's egress enforcement.

use crate::utils::paths::normalize_host;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use url::Host;

/// A single entry from a policy list: a lowercase domain that also covers
/// every subdomain beneath it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostPattern(String);

impl HostPattern {
    /// Build a pattern from raw list text. Returns None for text that is
    /// empty once trimmed.
    ///
    /// A leading dot is dropped (`.evil.com` already covers subdomains as
    /// `evil.com`), and non-ASCII names are converted to punycode so they
    /// compare equal to the hosts extracted from URLs.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_host(raw.trim().trim_start_matches('.'));
        if normalized.is_empty() {
            return None;
        }
        if normalized.is_ascii() {
            return Some(Self(normalized));
        }
        match Host::parse(&normalized) {
            Ok(Host::Domain(domain)) => Some(Self(domain)),
            _ => Some(Self(normalized)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact or parent-domain match. `host` must already be normalized.
    ///
    /// `example.com` matches `example.com` and `api.example.com`, but not
    /// `notexample.com` or `example.com.evil.net`.
    pub fn matches(&self, host: &str) -> bool {
        match host.strip_suffix(self.0.as_str()) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An unordered set of host patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostList {
    patterns: BTreeSet<HostPattern>,
}

impl HostList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: HostPattern) -> bool {
        self.patterns.insert(pattern)
    }

    /// First pattern (in sorted order) covering `host`, if any.
    pub fn find_match(&self, host: &str) -> Option<&HostPattern> {
        self.patterns.iter().find(|p| p.matches(host))
    }

    pub fn contains(&self, pattern: &HostPattern) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for HostList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = HostList::new();
        for raw in iter {
            if let Some(pattern) = HostPattern::new(raw) {
                list.insert(pattern);
            }
        }
        list
    }
}

/// The pair of lists a decision is made against. Block takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySet {
    pub blocklist: HostList,
    pub allowlist: HostList,
}

impl PolicySet {
    pub fn new(blocklist: HostList, allowlist: HostList) -> Self {
        Self {
            blocklist,
            allowlist,
        }
    }

    /// Convenience constructor used heavily in tests.
    pub fn from_slices(blocked: &[&str], allowed: &[&str]) -> Self {
        Self {
            blocklist: blocked.iter().copied().collect(),
            allowlist: allowed.iter().copied().collect(),
        }
    }
}

/// Whether the intercepted action may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Block,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow => write!(f, "allow"),
            Verdict::Block => write!(f, "block"),
        }
    }
}

/// What produced a decision. Lets callers (and the audit log) distinguish
/// block reasons without parsing the human-readable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    /// The invocation carried no network destination.
    NoCandidates,
    /// Host matched the allowlist and not the blocklist.
    Allowlisted,
    /// Host matched the blocklist.
    Blocklisted,
    /// Host matched neither list.
    NotAllowlisted,
    /// A candidate could not be reduced to a host.
    UnparsableHost,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::NoCandidates => write!(f, "no network destination"),
            Cause::Allowlisted => write!(f, "allowlisted"),
            Cause::Blocklisted => write!(f, "blocklisted"),
            Cause::NotAllowlisted => write!(f, "not allowlisted"),
            Cause::UnparsableHost => write!(f, "unparsable host"),
        }
    }
}

/// The result of evaluating an invocation. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub reason: String,
    pub cause: Cause,
    /// The list entry responsible, when one matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

impl Decision {
    /// Allow for an invocation that had nothing to check.
    pub fn no_candidates() -> Self {
        Self {
            verdict: Verdict::Allow,
            host: None,
            reason: "no network destination found".to_string(),
            cause: Cause::NoCandidates,
            matched_pattern: None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Block
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Allow => write!(f, "allowed: {}", self.reason),
            Verdict::Block => write!(f, "blocked: {}", self.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_normalized_on_load() {
        let pattern = HostPattern::new("  GitHub.COM \t").unwrap();
        assert_eq!(pattern.as_str(), "github.com");
        assert!(HostPattern::new("   ").is_none());
    }

    #[test]
    fn test_leading_dot_dropped() {
        let pattern = HostPattern::new(".Evil.com").unwrap();
        assert_eq!(pattern.as_str(), "evil.com");
        assert!(pattern.matches("evil.com"));
        assert!(pattern.matches("cdn.evil.com"));
        assert!(HostPattern::new(" . ").is_none());
    }

    #[test]
    fn test_unicode_entry_punycoded() {
        let pattern = HostPattern::new("Bücher.example").unwrap();
        assert_eq!(pattern.as_str(), "xn--bcher-kva.example");
        assert!(pattern.matches("shop.xn--bcher-kva.example"));
    }

    #[test]
    fn test_suffix_matching() {
        let pattern = HostPattern::new("example.com").unwrap();
        assert!(pattern.matches("example.com"));
        assert!(pattern.matches("api.example.com"));
        assert!(pattern.matches("a.b.example.com"));
        assert!(!pattern.matches("notexample.com"));
        assert!(!pattern.matches("example.com.evil.net"));
        assert!(!pattern.matches("com"));
    }

    #[test]
    fn test_list_dedupes() {
        let list: HostList = ["github.com", "GITHUB.com", " github.com "].into_iter().collect();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_decision_serializes_lowercase_verdict() {
        let json = serde_json::to_value(Decision::no_candidates()).unwrap();
        assert_eq!(json["verdict"], "allow");
        assert_eq!(json["cause"], "no_candidates");
        assert!(json.get("host").is_none());
    }
}
