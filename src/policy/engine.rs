//! Policy decision engine — the brain of hostgate.
//!
//! Evaluates one destination host against the blocklist and allowlist and
//! returns a Decision. The order is fixed:
//!
//! 1. no host could be extracted → the configured `on_unparsable_host` verdict
//! 2. blocklist match (exact or parent domain) → Block
//! 3. no allowlist match → Block (default-deny)
//! 4. otherwise → Allow
//!
//! Patterns are literal domains; there is no wildcard or regex syntax.

use crate::gate::extract::{ExtractedHost, NoHost};
use crate::policy::config::UnparsableHost;
use crate::policy::types::*;
use crate::utils::paths::normalize_host;

/// A loaded policy ready for evaluation. Holds no mutable state, so one
/// engine can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    policy: PolicySet,
    on_unparsable: UnparsableHost,
}

impl PolicyEngine {
    pub fn new(policy: PolicySet, on_unparsable: UnparsableHost) -> Self {
        Self {
            policy,
            on_unparsable,
        }
    }

    /// Evaluate the outcome of host extraction for one candidate.
    pub fn evaluate(&self, extracted: &Result<ExtractedHost, NoHost>) -> Decision {
        match extracted {
            Ok(host) => self.evaluate_host(host.as_str()),
            Err(no_host) => self.unparsable_decision(no_host),
        }
    }

    /// Evaluate a host name. Case and surrounding whitespace are ignored.
    pub fn evaluate_host(&self, host: &str) -> Decision {
        let host = normalize_host(host);

        if let Some(pattern) = self.policy.blocklist.find_match(&host) {
            return Decision {
                verdict: Verdict::Block,
                reason: format!("host '{}' is blocklisted (matches '{}')", host, pattern),
                host: Some(host),
                cause: Cause::Blocklisted,
                matched_pattern: Some(pattern.to_string()),
            };
        }

        match self.policy.allowlist.find_match(&host) {
            Some(pattern) => Decision {
                verdict: Verdict::Allow,
                reason: format!("host '{}' is allowlisted (matches '{}')", host, pattern),
                host: Some(host),
                cause: Cause::Allowlisted,
                matched_pattern: Some(pattern.to_string()),
            },
            None => Decision {
                verdict: Verdict::Block,
                reason: format!("host '{}' is not allowlisted", host),
                host: Some(host),
                cause: Cause::NotAllowlisted,
                matched_pattern: None,
            },
        }
    }

    fn unparsable_decision(&self, no_host: &NoHost) -> Decision {
        let verdict = self.on_unparsable.verdict();
        let reason = match verdict {
            Verdict::Block => format!("could not determine destination host ({})", no_host),
            Verdict::Allow => format!(
                "could not determine destination host ({}); allowed by configuration",
                no_host
            ),
        };
        Decision {
            verdict,
            host: None,
            reason,
            cause: Cause::UnparsableHost,
            matched_pattern: None,
        }
    }

    pub fn policy(&self) -> &PolicySet {
        &self.policy
    }

    pub fn on_unparsable(&self) -> UnparsableHost {
        self.on_unparsable
    }
}
