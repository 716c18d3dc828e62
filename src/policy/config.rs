//! Gate configuration — the optional `hostgate.yaml` next to the host lists.
//!
//! ```yaml
//! on_unparsable_host: block     # block | allow
//! scan_search_queries: true
//! audit_log: true
//! extra_network_tools: [httpx, gh]
//! ```
//!
//! Every field has a default, and the defaults are the strict settings, so a
//! missing file is the same as an empty one.

use crate::policy::types::Verdict;
use serde::{Deserialize, Serialize};

/// What to do when a candidate cannot be reduced to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnparsableHost {
    /// Treat the candidate as a blocked destination.
    #[default]
    Block,
    /// Treat the candidate as nothing to check.
    Allow,
}

impl UnparsableHost {
    pub fn verdict(self) -> Verdict {
        match self {
            UnparsableHost::Block => Verdict::Block,
            UnparsableHost::Allow => Verdict::Allow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub on_unparsable_host: UnparsableHost,
    /// Scan web-search queries for embedded URLs.
    pub scan_search_queries: bool,
    /// Append every decision to the audit log.
    pub audit_log: bool,
    /// Program names treated as network tools on top of the built-in set.
    pub extra_network_tools: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            on_unparsable_host: UnparsableHost::Block,
            scan_search_queries: true,
            audit_log: true,
            extra_network_tools: Vec::new(),
        }
    }
}
