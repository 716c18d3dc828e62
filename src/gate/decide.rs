//! Decision composition — candidates → hosts → verdicts, first block wins.

use crate::gate::collect::{Candidate, Invocation, NetworkTools, Source};
use crate::gate::extract::{extract_host, ExtractedHost, NoHost};
use crate::policy::types::Decision;
use crate::policy::PolicyEngine;

/// Decide one invocation.
///
/// Every candidate is extracted and evaluated in order; the first Block is
/// returned immediately. An invocation with no candidates is allowed, and
/// one whose candidates all pass returns the last Allow.
pub fn decide(invocation: &Invocation, engine: &PolicyEngine, tools: &NetworkTools) -> Decision {
    let mut allowed = None;

    for candidate in invocation.candidates(tools) {
        let extracted = host_of(&candidate);
        let decision = engine.evaluate(&extracted);
        tracing::debug!(
            candidate = %candidate.text,
            source = ?candidate.source,
            verdict = %decision.verdict,
            "Evaluated candidate"
        );

        if decision.is_blocked() {
            return decision;
        }
        allowed = Some(decision);
    }

    allowed.unwrap_or_else(Decision::no_candidates)
}

fn host_of(candidate: &Candidate<'_>) -> Result<ExtractedHost, NoHost> {
    match candidate.source {
        Source::Dynamic => Err(NoHost::Dynamic(candidate.text.to_string())),
        _ => extract_host(&candidate.text),
    }
}
